use crate::domain::{
    models::payment::{PaymentIntent, PaymentIntentStatus},
    ports::PaymentIntentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPaymentIntentRepo {
    pool: PgPool,
}

impl PostgresPaymentIntentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentIntentRepository for PostgresPaymentIntentRepo {
    async fn create(&self, intent: &PaymentIntent) -> Result<PaymentIntent, AppError> {
        sqlx::query_as::<_, PaymentIntent>(
            "INSERT INTO payment_intents (id, reservation_id, amount_cents, currency, status, client_token, provider_ref, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&intent.id).bind(&intent.reservation_id).bind(intent.amount_cents)
            .bind(&intent.currency).bind(intent.status).bind(&intent.client_token)
            .bind(&intent.provider_ref).bind(intent.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentIntent>, AppError> {
        sqlx::query_as::<_, PaymentIntent>("SELECT * FROM payment_intents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_reservation(&self, reservation_id: &str) -> Result<Option<PaymentIntent>, AppError> {
        sqlx::query_as::<_, PaymentIntent>(
            "SELECT * FROM payment_intents WHERE reservation_id = $1 AND status != 'FAILED' ORDER BY created_at DESC LIMIT 1"
        )
            .bind(reservation_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_status(&self, id: &str, status: PaymentIntentStatus) -> Result<PaymentIntent, AppError> {
        sqlx::query_as::<_, PaymentIntent>(
            "UPDATE payment_intents SET status = $1 WHERE id = $2 RETURNING *"
        )
            .bind(status).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
