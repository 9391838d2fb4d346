use crate::domain::{models::job::Job, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteJobRepo {
    pool: SqlitePool,
}

impl SqliteJobRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, job_type, payload, attempts, execute_at, status, error_message, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.attempts)
            .bind(job.execute_at).bind(&job.status).bind(&job.error_message).bind(job.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'PROCESSING' WHERE id IN (SELECT id FROM jobs WHERE status = 'PENDING' AND execute_at <= ? LIMIT ?) RETURNING *"
        )
            .bind(Utc::now())
            .bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = ?, error_message = ? WHERE id = ?")
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
        sqlx::query("UPDATE jobs SET status = 'PENDING', attempts = ?, execute_at = ?, error_message = ? WHERE id = ?")
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
