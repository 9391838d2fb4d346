use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::domain::models::reservation::ActorRole;

/// Caller role forwarded by the upstream identity layer via `X-Actor-Role`.
/// Absent header means a plain requester; an unknown value is rejected.
pub struct Actor(pub ActorRole);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get("X-Actor-Role") {
            None => Ok(Actor(ActorRole::Requester)),
            Some(value) => {
                let raw = value.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;
                let role = ActorRole::parse(raw).ok_or(StatusCode::BAD_REQUEST)?;
                Ok(Actor(role))
            }
        }
    }
}
