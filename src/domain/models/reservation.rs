use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::services::schedule::Slot;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Active reservations count against slot availability.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Unpaid,
    Authorized,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RequesterKind {
    Individual,
    Team,
}

/// Role of the caller acting on a reservation, supplied by the upstream
/// identity layer. Roster and captaincy checks happen there, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Requester,
    Manager,
    Admin,
}

impl ActorRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "requester" => Some(ActorRole::Requester),
            "manager" => Some(ActorRole::Manager),
            "admin" => Some(ActorRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub court_id: String,
    pub requester_id: String,
    pub requester_kind: RequesterKind,
    pub team_id: Option<String>,
    pub date: NaiveDate,
    pub start_min: i32,
    pub duration_min: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

pub struct NewReservationParams {
    pub slot: Slot,
    pub requester_id: String,
    pub requester_kind: RequesterKind,
    pub team_id: Option<String>,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        let slot = params.slot;
        let ends_at = slot.starts_at + Duration::minutes(slot.duration_min as i64);

        Self {
            id: Uuid::new_v4().to_string(),
            court_id: slot.court_id,
            requester_id: params.requester_id,
            requester_kind: params.requester_kind,
            team_id: params.team_id,
            date: slot.date,
            start_min: slot.start_min,
            duration_min: slot.duration_min,
            starts_at: slot.starts_at,
            ends_at,
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            created_at: Utc::now(),
            cancelled_at: None,
            cancellation_reason: None,
        }
    }
}
