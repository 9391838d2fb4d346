use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::models::job::Job;
use crate::domain::models::payment::{PaymentIntent, PaymentIntentStatus};
use crate::domain::models::reservation::{PaymentStatus, Reservation, ReservationStatus};
use crate::domain::ports::{
    ChargeVerification, CourtRepository, JobRepository, PaymentGateway, PaymentIntentRepository,
    ReservationRepository,
};
use crate::domain::services::reservation_service::ReservationService;
use crate::error::AppError;

/// Authorizes and server-side-verifies the charge tied to a reservation.
/// This service is the only writer of `Reservation::payment_status` and of
/// intent states.
pub struct PaymentService {
    reservations: Arc<dyn ReservationRepository>,
    intents: Arc<dyn PaymentIntentRepository>,
    courts: Arc<dyn CourtRepository>,
    jobs: Arc<dyn JobRepository>,
    gateway: Arc<dyn PaymentGateway>,
    lifecycle: Arc<ReservationService>,
}

impl PaymentService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        intents: Arc<dyn PaymentIntentRepository>,
        courts: Arc<dyn CourtRepository>,
        jobs: Arc<dyn JobRepository>,
        gateway: Arc<dyn PaymentGateway>,
        lifecycle: Arc<ReservationService>,
    ) -> Self {
        Self {
            reservations,
            intents,
            courts,
            jobs,
            gateway,
            lifecycle,
        }
    }

    /// Opens a charge for a pending reservation. The amount always comes
    /// from the court's per-session price, never from the client. At most
    /// one non-failed intent may exist per reservation.
    pub async fn authorize(
        &self,
        reservation_id: &str,
        method_token: Option<&str>,
    ) -> Result<PaymentIntent, AppError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        if reservation.status != ReservationStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "cannot charge a reservation in state {:?}",
                reservation.status
            )));
        }

        if self.intents.find_active_by_reservation(reservation_id).await?.is_some() {
            return Err(AppError::DuplicateIntent);
        }

        let court = self
            .courts
            .find_by_id(&reservation.court_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Court not found".into()))?;

        let created = self
            .gateway
            .create_intent(court.session_price_cents, &court.currency, method_token)
            .await?;

        let intent = PaymentIntent::new(
            reservation_id.to_string(),
            court.session_price_cents,
            court.currency.clone(),
            created.provider_ref,
        );
        let stored = self.intents.create(&intent).await?;
        self.reservations
            .set_payment_status(reservation_id, PaymentStatus::Authorized)
            .await?;

        info!("Payment intent {} opened for reservation {}", stored.id, reservation_id);
        Ok(stored)
    }

    /// Verifies the external charge server-side before trusting it. A
    /// gateway timeout or transport error counts as verification failure.
    /// On failure the reservation stays pending so payment can be retried
    /// with a fresh intent, without re-claiming the slot.
    pub async fn confirm(
        &self,
        intent_id: &str,
        reservation_id: &str,
    ) -> Result<Reservation, AppError> {
        let intent = self
            .intents
            .find_by_id(intent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment intent not found".into()))?;

        if intent.reservation_id != reservation_id {
            return Err(AppError::Validation(
                "Payment intent does not belong to this reservation".into(),
            ));
        }

        match intent.status {
            PaymentIntentStatus::RequiresPayment => {}
            PaymentIntentStatus::Succeeded => {
                // Repeated confirm after success: report the current state.
                return self
                    .reservations
                    .find_by_id(reservation_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Reservation not found".into()));
            }
            other => {
                return Err(AppError::InvalidState(format!(
                    "cannot confirm a payment intent in state {:?}",
                    other
                )));
            }
        }

        // The reservation may have been cancelled while the intent was open.
        // Refusing before verification means no charge is ever captured for
        // a reservation that can no longer be confirmed.
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;
        if reservation.status != ReservationStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "cannot confirm payment for a reservation in state {:?}",
                reservation.status
            )));
        }

        let verification = self.gateway.verify_intent(&intent.provider_ref).await;

        match verification {
            Ok(ChargeVerification::Succeeded) => {
                self.intents.set_status(&intent.id, PaymentIntentStatus::Succeeded).await?;
                self.reservations
                    .set_payment_status(reservation_id, PaymentStatus::Paid)
                    .await?;
                self.lifecycle.confirm_on_payment(reservation_id).await
            }
            Ok(ChargeVerification::Failed(reason)) => {
                warn!("Charge verification failed for intent {}: {}", intent.id, reason);
                self.fail_intent(&intent, reservation_id).await?;
                Err(AppError::PaymentVerification(reason))
            }
            Err(e) => {
                // Timeout or transport failure is never assumed successful.
                warn!("Charge verification unavailable for intent {}: {}", intent.id, e);
                self.fail_intent(&intent, reservation_id).await?;
                Err(AppError::PaymentVerification(
                    "verification unavailable, charge not trusted".into(),
                ))
            }
        }
    }

    async fn fail_intent(&self, intent: &PaymentIntent, reservation_id: &str) -> Result<(), AppError> {
        self.intents.set_status(&intent.id, PaymentIntentStatus::Failed).await?;
        self.reservations
            .set_payment_status(reservation_id, PaymentStatus::Failed)
            .await?;
        Ok(())
    }

    /// Queues the refund of a cancelled, paid reservation. The background
    /// worker retries with backoff and escalates when the budget runs out;
    /// the reservation is already cancelled regardless of the outcome.
    pub async fn schedule_refund(&self, reservation_id: &str) -> Result<Job, AppError> {
        let job = Job::refund(reservation_id.to_string());
        let created = self.jobs.create(&job).await?;
        info!("Refund queued for reservation {}", reservation_id);
        Ok(created)
    }

    /// One refund attempt, invoked by the worker. Idempotent on an already
    /// refunded intent.
    pub async fn execute_refund(&self, job: &Job) -> Result<(), AppError> {
        let reservation_id = &job.payload.reservation_id;

        let Some(intent) = self.intents.find_active_by_reservation(reservation_id).await? else {
            error!("Refund job {} found no intent for reservation {}", job.id, reservation_id);
            return Ok(());
        };

        match intent.status {
            PaymentIntentStatus::Refunded => return Ok(()),
            PaymentIntentStatus::Succeeded => {}
            other => {
                return Err(AppError::InvalidState(format!(
                    "refund requires a succeeded intent, found {:?}",
                    other
                )));
            }
        }

        self.gateway.refund_intent(&intent.provider_ref).await?;
        self.intents.set_status(&intent.id, PaymentIntentStatus::Refunded).await?;
        self.reservations
            .set_payment_status(reservation_id, PaymentStatus::Refunded)
            .await?;

        info!("Reservation {} refunded", reservation_id);
        Ok(())
    }
}
