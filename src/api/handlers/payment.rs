use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::requests::{ConfirmPaymentRequest, CreatePaymentIntentRequest};
use crate::api::dtos::responses::PaymentIntentResponse;
use crate::api::extractors::actor::Actor;
use crate::domain::models::reservation::ActorRole;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
    payload: Option<Json<CreatePaymentIntentRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.unwrap_or_default();

    let intent = state
        .payment_service
        .authorize(&reservation_id, payload.method_token.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentIntentResponse {
            intent_id: intent.id,
            client_token: intent.client_token,
            amount_cents: intent.amount_cents,
            currency: intent.currency,
        }),
    ))
}

pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Path(intent_id): Path<String>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state
        .payment_service
        .confirm(&intent_id, &payload.reservation_id)
        .await?;
    Ok(Json(reservation))
}

/// Refunds the worker gave up on, for manual review.
pub async fn list_escalated_refunds(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
) -> Result<impl IntoResponse, AppError> {
    if !matches!(actor, ActorRole::Manager | ActorRole::Admin) {
        return Err(AppError::Forbidden(
            "Only managers may review escalated refunds".into(),
        ));
    }

    let jobs = state.job_repo.list_escalated().await?;
    Ok(Json(jobs))
}
