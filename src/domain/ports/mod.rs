use crate::domain::models::{
    court::Court,
    job::Job,
    payment::{PaymentIntent, PaymentIntentStatus},
    reservation::{PaymentStatus, Reservation, ReservationStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn create(&self, court: &Court) -> Result<Court, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError>;
    async fn list(&self) -> Result<Vec<Court>, AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// The insert is the atomic claim on a slot: a concurrent winner leaves
    /// the loser with `SlotUnavailable` via the active-slot unique index.
    async fn create(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    async fn list_for_day(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError>;
    /// Written only by the lifecycle service.
    async fn set_status(
        &self,
        id: &str,
        status: ReservationStatus,
        cancelled_at: Option<DateTime<Utc>>,
        cancellation_reason: Option<String>,
    ) -> Result<Reservation, AppError>;
    /// Written only by the payment orchestrator.
    async fn set_payment_status(&self, id: &str, payment_status: PaymentStatus) -> Result<Reservation, AppError>;
    async fn find_completable(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, AppError>;
}

#[async_trait]
pub trait PaymentIntentRepository: Send + Sync {
    async fn create(&self, intent: &PaymentIntent) -> Result<PaymentIntent, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentIntent>, AppError>;
    /// The most recent non-FAILED intent, if any. FAILED intents do not
    /// block a retry with a fresh intent.
    async fn find_active_by_reservation(&self, reservation_id: &str) -> Result<Option<PaymentIntent>, AppError>;
    async fn set_status(&self, id: &str, status: PaymentIntentStatus) -> Result<PaymentIntent, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
    async fn reschedule(
        &self,
        id: &str,
        attempts: i32,
        execute_at: DateTime<Utc>,
        error_message: Option<String>,
    ) -> Result<(), AppError>;
    async fn list_escalated(&self) -> Result<Vec<Job>, AppError>;
}

pub struct CreatedIntent {
    pub provider_ref: String,
}

pub enum ChargeVerification {
    Succeeded,
    Failed(String),
}

/// External payment provider. Implementations must bound every call with a
/// timeout; callers treat transport errors during verification as failure,
/// never as success.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        method_token: Option<&str>,
    ) -> Result<CreatedIntent, AppError>;
    async fn verify_intent(&self, provider_ref: &str) -> Result<ChargeVerification, AppError>;
    async fn refund_intent(&self, provider_ref: &str) -> Result<(), AppError>;
}
