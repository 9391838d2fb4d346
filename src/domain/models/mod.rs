pub mod court;
pub mod job;
pub mod payment;
pub mod reservation;
