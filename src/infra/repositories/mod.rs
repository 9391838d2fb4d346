pub mod postgres_court_repo;
pub mod postgres_job_repo;
pub mod postgres_payment_repo;
pub mod postgres_reservation_repo;
pub mod sqlite_court_repo;
pub mod sqlite_job_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_reservation_repo;
