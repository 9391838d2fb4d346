use serde::Serialize;

use crate::domain::services::availability::{Occupant, SlotStatus};

#[derive(Serialize)]
pub struct SlotView {
    pub start_time: String,
    pub duration_min: i32,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant: Option<Occupant>,
}

impl From<SlotStatus> for SlotView {
    fn from(status: SlotStatus) -> Self {
        Self {
            start_time: status.slot.start_label(),
            duration_min: status.slot.duration_min,
            is_available: status.is_available,
            occupant: status.occupant,
        }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct PaymentIntentResponse {
    pub intent_id: String,
    pub client_token: String,
    pub amount_cents: i64,
    pub currency: String,
}
