use crate::domain::{
    models::reservation::{PaymentStatus, Reservation, ReservationStatus},
    ports::ReservationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, court_id, requester_id, requester_kind, team_id, date, start_min, duration_min, starts_at, ends_at, status, payment_status, created_at, cancelled_at, cancellation_reason)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.court_id).bind(&reservation.requester_id)
            .bind(reservation.requester_kind).bind(&reservation.team_id)
            .bind(reservation.date).bind(reservation.start_min).bind(reservation.duration_min)
            .bind(reservation.starts_at).bind(reservation.ends_at)
            .bind(reservation.status).bind(reservation.payment_status)
            .bind(reservation.created_at).bind(reservation.cancelled_at).bind(&reservation.cancellation_reason)
            .fetch_one(&self.pool).await
            .map_err(|e| {
                if AppError::is_unique_violation(&e) {
                    // Lost the claim race on the active-slot index.
                    AppError::SlotUnavailable
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_day(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE court_id = ? AND date = ? ORDER BY start_min ASC"
        )
            .bind(court_id).bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ReservationStatus,
        cancelled_at: Option<DateTime<Utc>>,
        cancellation_reason: Option<String>,
    ) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = ?, cancelled_at = COALESCE(?, cancelled_at), cancellation_reason = COALESCE(?, cancellation_reason)
             WHERE id = ?
             RETURNING *"
        )
            .bind(status).bind(cancelled_at).bind(cancellation_reason).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_payment_status(&self, id: &str, payment_status: PaymentStatus) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET payment_status = ? WHERE id = ? RETURNING *"
        )
            .bind(payment_status).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_completable(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE status = 'CONFIRMED' AND ends_at <= ?"
        )
            .bind(now)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
