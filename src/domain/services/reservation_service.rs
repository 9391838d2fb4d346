use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::models::court::Court;
use crate::domain::models::payment::PaymentIntentStatus;
use crate::domain::models::reservation::{
    ActorRole, NewReservationParams, Reservation, RequesterKind, ReservationStatus,
};
use crate::domain::ports::{PaymentIntentRepository, ReservationRepository};
use crate::domain::services::availability::merge_availability;
use crate::domain::services::schedule::resolve_slots;
use crate::error::AppError;

pub struct RequesterContext {
    pub requester_id: String,
    pub requester_kind: RequesterKind,
    pub team_id: Option<String>,
}

/// Drives a reservation through pending -> confirmed -> completed, with
/// cancellation branching off both active states. This service is the only
/// writer of `Reservation::status`.
pub struct ReservationService {
    reservations: Arc<dyn ReservationRepository>,
    intents: Arc<dyn PaymentIntentRepository>,
    booking_buffer_min: i64,
    notice_hours: i64,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        intents: Arc<dyn PaymentIntentRepository>,
        booking_buffer_min: i64,
        notice_hours: i64,
    ) -> Self {
        Self {
            reservations,
            intents,
            booking_buffer_min,
            notice_hours,
        }
    }

    /// Claims a slot. Availability is re-checked here, at claim time, and the
    /// insert itself races through the active-slot unique index, so a
    /// concurrent claim on the same slot surfaces as `SlotUnavailable` on
    /// exactly one side.
    pub async fn create(
        &self,
        court: &Court,
        date: NaiveDate,
        start_min: i32,
        requester: RequesterContext,
    ) -> Result<Reservation, AppError> {
        let slots = resolve_slots(court, date, Utc::now(), self.booking_buffer_min);
        let Some(slot) = slots.into_iter().find(|s| s.start_min == start_min) else {
            warn!("Claim rejected: {} {} min {} is not a bookable slot", court.id, date, start_min);
            return Err(AppError::SlotUnavailable);
        };

        let existing = self.reservations.list_for_day(&court.id, date).await?;
        let merged = merge_availability(vec![slot.clone()], &existing, false);
        if !merged.first().is_some_and(|s| s.is_available) {
            return Err(AppError::SlotUnavailable);
        }

        let reservation = Reservation::new(NewReservationParams {
            slot,
            requester_id: requester.requester_id,
            requester_kind: requester.requester_kind,
            team_id: requester.team_id,
        });

        let created = self.reservations.create(&reservation).await?;
        info!("Reservation {} created for court {} on {}", created.id, created.court_id, created.date);
        Ok(created)
    }

    /// pending -> confirmed, only once the linked intent has succeeded.
    pub async fn confirm_on_payment(&self, reservation_id: &str) -> Result<Reservation, AppError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        if reservation.status != ReservationStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "cannot confirm a reservation in state {:?}",
                reservation.status
            )));
        }

        let intent = self
            .intents
            .find_active_by_reservation(reservation_id)
            .await?
            .ok_or_else(|| AppError::InvalidState("no payment intent for this reservation".into()))?;

        if intent.status != PaymentIntentStatus::Succeeded {
            return Err(AppError::InvalidState("payment has not succeeded".into()));
        }

        let confirmed = self
            .reservations
            .set_status(reservation_id, ReservationStatus::Confirmed, None, None)
            .await?;
        info!("Reservation {} confirmed", reservation_id);
        Ok(confirmed)
    }

    /// Cancels an active reservation. Requesters are bound to the notice
    /// window; managers and admins may cancel until the scheduled start.
    /// Refunding a paid reservation is the orchestrator's job and is
    /// triggered by the caller, decoupled from this transition.
    pub async fn cancel(
        &self,
        reservation_id: &str,
        actor: ActorRole,
        reason: Option<String>,
    ) -> Result<Reservation, AppError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        if !reservation.status.is_active() {
            return Err(AppError::InvalidState(format!(
                "cannot cancel a reservation in state {:?}",
                reservation.status
            )));
        }

        let now = Utc::now();
        check_cancellation_window(actor, now, reservation.starts_at, self.notice_hours)?;

        let cancelled = self
            .reservations
            .set_status(reservation_id, ReservationStatus::Cancelled, Some(now), reason)
            .await?;
        info!("Reservation {} cancelled by {:?}", reservation_id, actor);
        Ok(cancelled)
    }

    /// System-driven transition once the scheduled end has elapsed.
    /// Idempotent: completing an already-completed reservation is a no-op.
    pub async fn mark_completed(&self, reservation_id: &str) -> Result<Reservation, AppError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        match reservation.status {
            ReservationStatus::Completed => Ok(reservation),
            ReservationStatus::Confirmed if reservation.ends_at <= Utc::now() => {
                self.reservations
                    .set_status(reservation_id, ReservationStatus::Completed, None, None)
                    .await
            }
            ReservationStatus::Confirmed => Err(AppError::InvalidState(
                "reservation has not finished yet".into(),
            )),
            other => Err(AppError::InvalidState(format!(
                "cannot complete a reservation in state {:?}",
                other
            ))),
        }
    }
}

/// Pure cancellation-window policy. Nobody cancels after the start; a
/// requester additionally needs `now + notice <= start`.
pub fn check_cancellation_window(
    actor: ActorRole,
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
    notice_hours: i64,
) -> Result<(), AppError> {
    if now >= starts_at {
        return Err(AppError::InvalidState(
            "reservation has already started".into(),
        ));
    }
    if actor == ActorRole::Requester && now + Duration::hours(notice_hours) > starts_at {
        return Err(AppError::CancellationWindow(format!(
            "Reservations must be cancelled at least {} hours before the scheduled start",
            notice_hours
        )));
    }
    Ok(())
}
