use court_booking::{
    api::router::create_router,
    config::Config,
    domain::ports::{ChargeVerification, CreatedIntent, PaymentGateway},
    domain::services::payment_service::PaymentService,
    domain::services::reservation_service::ReservationService,
    error::AppError,
    infra::repositories::{
        sqlite_court_repo::SqliteCourtRepo, sqlite_job_repo::SqliteJobRepo,
        sqlite_payment_repo::SqlitePaymentIntentRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
    },
    state::AppState,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Clone)]
pub enum VerifyOutcome {
    Succeed,
    Fail(String),
    Unavailable,
}

/// In-memory provider stand-in. Verification outcome and refund failures
/// are scripted per test.
pub struct MockPaymentGateway {
    pub verify_outcome: Mutex<VerifyOutcome>,
    /// Refund calls fail while this is positive, decrementing each time.
    pub refund_failures: Mutex<i32>,
    pub refund_calls: Mutex<i32>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            verify_outcome: Mutex::new(VerifyOutcome::Succeed),
            refund_failures: Mutex::new(0),
            refund_calls: Mutex::new(0),
        }
    }

    pub fn set_verify_outcome(&self, outcome: VerifyOutcome) {
        *self.verify_outcome.lock().unwrap() = outcome;
    }

    pub fn fail_next_refunds(&self, count: i32) {
        *self.refund_failures.lock().unwrap() = count;
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_intent(
        &self,
        _amount_cents: i64,
        _currency: &str,
        _method_token: Option<&str>,
    ) -> Result<CreatedIntent, AppError> {
        Ok(CreatedIntent {
            provider_ref: format!("pi_{}", Uuid::new_v4()),
        })
    }

    async fn verify_intent(&self, _provider_ref: &str) -> Result<ChargeVerification, AppError> {
        match self.verify_outcome.lock().unwrap().clone() {
            VerifyOutcome::Succeed => Ok(ChargeVerification::Succeeded),
            VerifyOutcome::Fail(reason) => Ok(ChargeVerification::Failed(reason)),
            VerifyOutcome::Unavailable => Err(AppError::InternalWithMsg(
                "gateway unreachable".to_string(),
            )),
        }
    }

    async fn refund_intent(&self, _provider_ref: &str) -> Result<(), AppError> {
        *self.refund_calls.lock().unwrap() += 1;
        let mut failures = self.refund_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(AppError::InternalWithMsg("refund rejected".to_string()));
        }
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub gateway: Arc<MockPaymentGateway>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::new_with(|_| {}).await
    }

    pub async fn new_with(adjust: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_api_url: "http://localhost".to_string(),
            payment_api_token: "token".to_string(),
            booking_buffer_min: 30,
            cancellation_notice_hours: 24,
            refund_max_attempts: 5,
        };
        adjust(&mut config);

        let gateway = Arc::new(MockPaymentGateway::new());

        let court_repo = Arc::new(SqliteCourtRepo::new(pool.clone()));
        let reservation_repo = Arc::new(SqliteReservationRepo::new(pool.clone()));
        let payment_intent_repo = Arc::new(SqlitePaymentIntentRepo::new(pool.clone()));
        let job_repo = Arc::new(SqliteJobRepo::new(pool.clone()));

        let reservation_service = Arc::new(ReservationService::new(
            reservation_repo.clone(),
            payment_intent_repo.clone(),
            config.booking_buffer_min,
            config.cancellation_notice_hours,
        ));

        let payment_service = Arc::new(PaymentService::new(
            reservation_repo.clone(),
            payment_intent_repo.clone(),
            court_repo.clone(),
            job_repo.clone(),
            gateway.clone(),
            reservation_service.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            court_repo,
            reservation_repo,
            payment_intent_repo,
            job_repo,
            reservation_service,
            payment_service,
        });

        // The worker loop is not spawned here; tests drive the sweep and
        // the job queue directly for determinism.
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            gateway,
        }
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.get_as(uri, None).await
    }

    pub async fn get_as(&self, uri: &str, role: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(role) = role {
            builder = builder.header("X-Actor-Role", role);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post(&self, uri: &str, body: Value) -> axum::response::Response {
        self.post_as(uri, body, None).await
    }

    pub async fn post_as(
        &self,
        uri: &str,
        body: Value,
        role: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(role) = role {
            builder = builder.header("X-Actor-Role", role);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// A court open every day 08:00-22:00, 90 minute sessions, 5000 cents.
    pub async fn create_court(&self, name: &str) -> Value {
        self.create_court_with(name, "UTC", 90, all_week("08:00", "22:00"))
            .await
    }

    pub async fn create_court_with(
        &self,
        name: &str,
        timezone: &str,
        session_duration_min: i32,
        schedule: Value,
    ) -> Value {
        let response = self
            .post(
                "/api/v1/courts",
                json!({
                    "name": name,
                    "timezone": timezone,
                    "session_duration_min": session_duration_min,
                    "session_price_cents": 5000,
                    "currency": "EUR",
                    "schedule": schedule
                }),
            )
            .await;
        assert!(
            response.status().is_success(),
            "create_court failed: {}",
            response.status()
        );
        parse_body(response).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub fn all_week(start: &str, end: &str) -> Value {
    let day = json!({ "is_open": true, "start": start, "end": end });
    json!({
        "monday": day.clone(), "tuesday": day.clone(), "wednesday": day.clone(),
        "thursday": day.clone(), "friday": day.clone(), "saturday": day.clone(),
        "sunday": day
    })
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
