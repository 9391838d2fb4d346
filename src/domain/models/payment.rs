use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentIntentStatus {
    RequiresPayment,
    Succeeded,
    Failed,
    Refunded,
}

/// A charge tied 1:1 to a reservation. The link is fixed at creation and
/// an intent is never moved to another reservation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub reservation_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentIntentStatus,
    pub client_token: String,
    pub provider_ref: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    pub fn new(reservation_id: String, amount_cents: i64, currency: String, provider_ref: String) -> Self {
        let client_token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            reservation_id,
            amount_cents,
            currency,
            status: PaymentIntentStatus::RequiresPayment,
            client_token,
            provider_ref,
            created_at: Utc::now(),
        }
    }
}
