use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::dtos::requests::CreateCourtRequest;
use crate::domain::models::court::Court;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_court(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Court name must not be empty".into()));
    }
    if payload.timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation(format!(
            "Unknown timezone: {}",
            payload.timezone
        )));
    }
    if payload.session_duration_min <= 0 {
        return Err(AppError::Validation(
            "Session duration must be positive".into(),
        ));
    }
    if payload.session_price_cents < 0 {
        return Err(AppError::Validation(
            "Session price must not be negative".into(),
        ));
    }
    if payload.currency.trim().is_empty() {
        return Err(AppError::Validation("Currency must not be empty".into()));
    }

    let schedule_json = serde_json::to_string(&payload.schedule)
        .map_err(|e| AppError::InternalWithMsg(format!("schedule serialization: {}", e)))?;

    let court = Court {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        timezone: payload.timezone,
        session_duration_min: payload.session_duration_min,
        session_price_cents: payload.session_price_cents,
        currency: payload.currency,
        schedule_json,
        created_at: Utc::now(),
    };

    let created = state.court_repo.create(&court).await?;
    info!("Court {} created", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let courts = state.court_repo.list().await?;
    Ok(Json(courts))
}

pub async fn get_court(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let court = state
        .court_repo
        .find_by_id(&court_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Court not found".into()))?;
    Ok(Json(court))
}
