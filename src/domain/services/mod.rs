pub mod availability;
pub mod payment_service;
pub mod reservation_service;
pub mod schedule;
