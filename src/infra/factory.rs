use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{
    CourtRepository, JobRepository, PaymentGateway, PaymentIntentRepository, ReservationRepository,
};
use crate::domain::services::payment_service::PaymentService;
use crate::domain::services::reservation_service::ReservationService;
use crate::infra::payment::http_gateway::HttpPaymentGateway;
use crate::infra::repositories::{
    postgres_court_repo::PostgresCourtRepo, postgres_job_repo::PostgresJobRepo,
    postgres_payment_repo::PostgresPaymentIntentRepo,
    postgres_reservation_repo::PostgresReservationRepo, sqlite_court_repo::SqliteCourtRepo,
    sqlite_job_repo::SqliteJobRepo, sqlite_payment_repo::SqlitePaymentIntentRepo,
    sqlite_reservation_repo::SqliteReservationRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(
        config.payment_api_url.clone(),
        config.payment_api_token.clone(),
    ));

    let (court_repo, reservation_repo, payment_intent_repo, job_repo): (
        Arc<dyn CourtRepository>,
        Arc<dyn ReservationRepository>,
        Arc<dyn PaymentIntentRepository>,
        Arc<dyn JobRepository>,
    ) = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        (
            Arc::new(PostgresCourtRepo::new(pool.clone())),
            Arc::new(PostgresReservationRepo::new(pool.clone())),
            Arc::new(PostgresPaymentIntentRepo::new(pool.clone())),
            Arc::new(PostgresJobRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        (
            Arc::new(SqliteCourtRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqlitePaymentIntentRepo::new(pool.clone())),
            Arc::new(SqliteJobRepo::new(pool)),
        )
    };

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

    AppState {
        config: config.clone(),
        court_repo,
        reservation_repo,
        payment_intent_repo,
        job_repo,
        reservation_service,
        payment_service,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
