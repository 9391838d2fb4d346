use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::dtos::requests::{CancelReservationRequest, CreateReservationRequest};
use crate::api::dtos::responses::{SlotView, SlotsResponse};
use crate::api::extractors::actor::Actor;
use crate::domain::models::reservation::{ActorRole, PaymentStatus, RequesterKind};
use crate::domain::services::availability::merge_availability;
use crate::domain::services::reservation_service::RequesterContext;
use crate::domain::services::schedule::{parse_hhmm, resolve_slots};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

/// The day's slot grid with availability. Occupant details are only exposed
/// to managers and admins. A reservation-store outage degrades to an
/// all-available grid instead of failing the read.
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(court_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, expected YYYY-MM-DD".into()))?;

    let court = state
        .court_repo
        .find_by_id(&court_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Court not found".into()))?;

    let slots = resolve_slots(&court, date, Utc::now(), state.config.booking_buffer_min);

    let reservations = match state.reservation_repo.list_for_day(&court_id, date).await {
        Ok(reservations) => reservations,
        Err(e) => {
            error!("Reservation lookup failed for court {} on {}: {}", court_id, date, e);
            Vec::new()
        }
    };

    let include_occupants = matches!(actor, ActorRole::Manager | ActorRole::Admin);
    let merged = merge_availability(slots, &reservations, include_occupants);

    Ok(Json(SlotsResponse {
        date: query.date,
        slots: merged.into_iter().map(SlotView::from).collect(),
    }))
}

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, expected YYYY-MM-DD".into()))?;
    let start_min = parse_hhmm(&payload.time)
        .ok_or_else(|| AppError::Validation("Invalid time format, expected HH:MM".into()))?
        as i32;

    if payload.requester_id.trim().is_empty() {
        return Err(AppError::Validation("requester_id must not be empty".into()));
    }
    let requester_kind = payload.requester_kind.unwrap_or(RequesterKind::Individual);
    if requester_kind == RequesterKind::Team && payload.team_id.is_none() {
        return Err(AppError::Validation(
            "team_id is required for team reservations".into(),
        ));
    }

    let court = state
        .court_repo
        .find_by_id(&court_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Court not found".into()))?;

    let reservation = state
        .reservation_service
        .create(
            &court,
            date,
            start_min,
            RequesterContext {
                requester_id: payload.requester_id,
                requester_kind,
                team_id: payload.team_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state
        .reservation_repo
        .find_by_id(&reservation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;
    Ok(Json(reservation))
}

/// Cancels a reservation and, when money has already moved, queues the
/// refund. The cancellation stands even if the queueing fails; the worker
/// queue is the refund's system of record from then on.
pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(reservation_id): Path<String>,
    Json(payload): Json<CancelReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state
        .reservation_service
        .cancel(&reservation_id, actor, payload.reason)
        .await?;

    if cancelled.payment_status == PaymentStatus::Paid {
        match state.payment_service.schedule_refund(&reservation_id).await {
            Ok(job) => info!("Refund job {} queued for reservation {}", job.id, reservation_id),
            Err(e) => error!("Failed to queue refund for reservation {}: {}", reservation_id, e),
        }
    }

    Ok(Json(cancelled))
}
