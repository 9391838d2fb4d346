use crate::domain::{models::job::Job, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, job_type, payload, attempts, execute_at, status, error_message, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.attempts)
            .bind(job.execute_at).bind(&job.status).bind(&job.error_message).bind(job.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'PROCESSING' WHERE id IN (SELECT id FROM jobs WHERE status = 'PENDING' AND execute_at <= $1 LIMIT $2 FOR UPDATE SKIP LOCKED) RETURNING *"
        )
            .bind(Utc::now())
            .bind(limit as i64)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = $1, error_message = $2 WHERE id = $3")
            .bind(status).bind(error_message).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn reschedule(
        &self,
        id: &str,
        attempts: i32,
        execute_at: DateTime<Utc>,
        error_message: Option<String>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = 'PENDING', attempts = $1, execute_at = $2, error_message = $3 WHERE id = $4")
            .bind(attempts).bind(execute_at).bind(error_message).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_escalated(&self) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE status = 'ESCALATED' ORDER BY created_at DESC LIMIT 100"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
