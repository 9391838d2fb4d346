use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const JOB_TYPE_REFUND: &str = "REFUND";

pub const JOB_STATUS_PENDING: &str = "PENDING";
pub const JOB_STATUS_COMPLETED: &str = "COMPLETED";
pub const JOB_STATUS_ESCALATED: &str = "ESCALATED";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobPayload {
    pub reservation_id: String,
}

/// Deferred work item processed by the background worker. Currently only
/// refunds flow through here; failed attempts back off and eventually land
/// in ESCALATED, the queue a manager reviews by hand.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Job {
    pub id: String,
    pub job_type: String,
    pub payload: Json<JobPayload>,
    pub attempts: i32,
    pub execute_at: DateTime<Utc>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn refund(reservation_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: JOB_TYPE_REFUND.to_string(),
            payload: Json(JobPayload { reservation_id }),
            attempts: 0,
            execute_at: Utc::now(),
            status: JOB_STATUS_PENDING.to_string(),
            error_message: None,
            created_at: Utc::now(),
        }
    }
}
