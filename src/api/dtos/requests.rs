use serde::Deserialize;

use crate::domain::models::court::WeekSchedule;
use crate::domain::models::reservation::RequesterKind;

#[derive(Deserialize)]
pub struct CreateCourtRequest {
    pub name: String,
    pub timezone: String,
    pub session_duration_min: i32,
    pub session_price_cents: i64,
    pub currency: String,
    pub schedule: WeekSchedule,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub date: String,
    pub time: String,
    pub requester_id: String,
    pub requester_kind: Option<RequesterKind>,
    pub team_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelReservationRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreatePaymentIntentRequest {
    pub method_token: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub reservation_id: String,
}
