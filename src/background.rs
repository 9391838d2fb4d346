use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::job::{Job, JOB_STATUS_COMPLETED, JOB_STATUS_ESCALATED};
use crate::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const JOB_BATCH_SIZE: i32 = 10;

/// First retry delay; doubles on every failed attempt.
const RETRY_BASE_SECS: i64 = 30;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background worker...");

    loop {
        run_completion_sweep(&state).await;
        run_due_jobs(&state).await;
        sleep(POLL_INTERVAL).await;
    }
}

/// Flips confirmed reservations whose scheduled end has elapsed to
/// COMPLETED. A failure on one reservation is logged and does not stop
/// the sweep.
pub async fn run_completion_sweep(state: &Arc<AppState>) {
    let due = match state.reservation_repo.find_completable(Utc::now()).await {
        Ok(due) => due,
        Err(e) => {
            error!("Completion sweep query failed: {:?}", e);
            return;
        }
    };

    for reservation in due {
        let span = info_span!("completion_sweep", reservation_id = %reservation.id);
        async {
            match state.reservation_service.mark_completed(&reservation.id).await {
                Ok(_) => info!("Reservation completed"),
                Err(e) => error!("Failed to complete reservation: {:?}", e),
            }
        }
        .instrument(span)
        .await;
    }
}

/// Claims and executes due jobs. A failed refund is rescheduled with
/// exponential backoff until the attempt budget runs out, then escalated
/// for manual review.
pub async fn run_due_jobs(state: &Arc<AppState>) {
    let jobs = match state.job_repo.find_pending(JOB_BATCH_SIZE).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to fetch pending jobs: {:?}", e);
            return;
        }
    };

    for job in jobs {
        let span = info_span!(
            "background_job",
            job_id = %job.id,
            job_type = %job.job_type,
            attempt = job.attempts + 1
        );

        async {
            info!("Processing job");
            match state.payment_service.execute_refund(&job).await {
                Ok(_) => {
                    if let Err(e) = state
                        .job_repo
                        .update_status(&job.id, JOB_STATUS_COMPLETED, None)
                        .await
                    {
                        error!("Failed to mark job as completed: {:?}", e);
                    }
                }
                Err(e) => {
                    let err_msg = format!("{}", e);
                    warn!("Job attempt failed: {}", err_msg);
                    if let Err(e) = retry_or_escalate(state, &job, err_msg).await {
                        error!("Failed to reschedule job: {:?}", e);
                    }
                }
            }
        }
        .instrument(span)
        .await;
    }
}

async fn retry_or_escalate(
    state: &Arc<AppState>,
    job: &Job,
    err_msg: String,
) -> Result<(), crate::error::AppError> {
    let attempts = job.attempts + 1;

    if attempts >= state.config.refund_max_attempts {
        error!("Job {} exhausted its {} attempts, escalating", job.id, attempts);
        state
            .job_repo
            .update_status(&job.id, JOB_STATUS_ESCALATED, Some(err_msg))
            .await
    } else {
        let delay = RETRY_BASE_SECS << (attempts - 1).min(10);
        let execute_at = Utc::now() + chrono::Duration::seconds(delay);
        state
            .job_repo
            .reschedule(&job.id, attempts, execute_at, Some(err_msg))
            .await
    }
}
