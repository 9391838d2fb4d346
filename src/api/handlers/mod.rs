pub mod court;
pub mod health;
pub mod payment;
pub mod reservation;
