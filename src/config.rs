use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub payment_api_url: String,
    pub payment_api_token: String,
    /// Same-day slots are only offered if they start strictly after
    /// now + buffer.
    pub booking_buffer_min: i64,
    /// Requester-initiated cancellations must happen at least this many
    /// hours before the scheduled start.
    pub cancellation_notice_hours: i64,
    pub refund_max_attempts: i32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            payment_api_url: env::var("PAYMENT_API_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1".to_string()),
            payment_api_token: env::var("PAYMENT_API_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            booking_buffer_min: env::var("BOOKING_BUFFER_MIN").unwrap_or_else(|_| "30".to_string()).parse().expect("BOOKING_BUFFER_MIN must be a number"),
            cancellation_notice_hours: env::var("CANCELLATION_NOTICE_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("CANCELLATION_NOTICE_HOURS must be a number"),
            refund_max_attempts: env::var("REFUND_MAX_ATTEMPTS").unwrap_or_else(|_| "5".to_string()).parse().expect("REFUND_MAX_ATTEMPTS must be a number"),
        }
    }
}
