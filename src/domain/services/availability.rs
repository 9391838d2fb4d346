use serde::Serialize;

use crate::domain::models::reservation::{Reservation, RequesterKind};
use crate::domain::services::schedule::Slot;

#[derive(Debug, Serialize, Clone)]
pub struct Occupant {
    pub requester_id: String,
    pub requester_kind: RequesterKind,
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SlotStatus {
    pub slot: Slot,
    pub is_available: bool,
    pub occupant: Option<Occupant>,
}

fn overlaps(a_start: i64, a_dur: i64, b_start: i64, b_dur: i64) -> bool {
    a_start < b_start + b_dur && b_start < a_start + a_dur
}

/// Flags each resolved slot against the day's reservations. A slot is taken
/// iff an active reservation for the same court/date overlaps it
/// (open-interval). Occupant details are attached only when the caller is
/// allowed to see them; duplicate or unsorted reservation rows are fine,
/// only the existence of a match matters.
pub fn merge_availability(
    slots: Vec<Slot>,
    reservations: &[Reservation],
    include_occupants: bool,
) -> Vec<SlotStatus> {
    slots
        .into_iter()
        .map(|slot| {
            let taken = reservations.iter().find(|r| {
                r.status.is_active()
                    && r.court_id == slot.court_id
                    && r.date == slot.date
                    && overlaps(
                        slot.start_min as i64,
                        slot.duration_min as i64,
                        r.start_min as i64,
                        r.duration_min as i64,
                    )
            });

            match taken {
                Some(r) => SlotStatus {
                    is_available: false,
                    occupant: include_occupants.then(|| Occupant {
                        requester_id: r.requester_id.clone(),
                        requester_kind: r.requester_kind,
                        team_id: r.team_id.clone(),
                    }),
                    slot,
                },
                None => SlotStatus {
                    slot,
                    is_available: true,
                    occupant: None,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::reservation::{PaymentStatus, ReservationStatus};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn slot(start_min: i32) -> Slot {
        Slot {
            court_id: "court-1".to_string(),
            date: date(),
            start_min,
            duration_min: 90,
            starts_at: Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
                + Duration::minutes(start_min as i64),
        }
    }

    fn reservation(start_min: i32, status: ReservationStatus) -> Reservation {
        Reservation {
            id: format!("res-{start_min}"),
            court_id: "court-1".to_string(),
            requester_id: "user-7".to_string(),
            requester_kind: RequesterKind::Individual,
            team_id: None,
            date: date(),
            start_min,
            duration_min: 90,
            starts_at: Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
                + Duration::minutes(start_min as i64),
            ends_at: Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
                + Duration::minutes(start_min as i64 + 90),
            status,
            payment_status: PaymentStatus::Unpaid,
            created_at: Utc::now(),
            cancelled_at: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn active_reservation_takes_its_slot() {
        let slots = vec![slot(480), slot(570), slot(660)];
        let reservations = vec![reservation(570, ReservationStatus::Confirmed)];

        let merged = merge_availability(slots, &reservations, false);
        assert!(merged[0].is_available);
        assert!(!merged[1].is_available);
        assert!(merged[2].is_available);
    }

    #[test]
    fn cancelled_and_completed_do_not_block() {
        let slots = vec![slot(480)];
        let reservations = vec![
            reservation(480, ReservationStatus::Cancelled),
            reservation(480, ReservationStatus::Completed),
        ];

        let merged = merge_availability(slots, &reservations, false);
        assert!(merged[0].is_available);
    }

    #[test]
    fn duplicate_rows_for_one_slot_are_tolerated() {
        let slots = vec![slot(480)];
        let reservations = vec![
            reservation(480, ReservationStatus::Pending),
            reservation(480, ReservationStatus::Pending),
            reservation(480, ReservationStatus::Cancelled),
        ];

        let merged = merge_availability(slots, &reservations, false);
        assert_eq!(merged.len(), 1);
        assert!(!merged[0].is_available);
    }

    #[test]
    fn partial_overlap_blocks_the_slot() {
        let slots = vec![slot(480)];
        // 08:30 reservation overlaps the 08:00-09:30 slot without matching it.
        let reservations = vec![reservation(510, ReservationStatus::Pending)];

        let merged = merge_availability(slots, &reservations, false);
        assert!(!merged[0].is_available);
    }

    #[test]
    fn adjacent_reservation_does_not_block() {
        let slots = vec![slot(480)];
        // Ends exactly where the slot begins: open-interval, no overlap.
        let reservations = vec![reservation(390, ReservationStatus::Confirmed)];

        let merged = merge_availability(slots, &reservations, false);
        assert!(merged[0].is_available);
    }

    #[test]
    fn occupant_only_shown_when_authorized() {
        let slots = vec![slot(480)];
        let reservations = vec![reservation(480, ReservationStatus::Confirmed)];

        let hidden = merge_availability(slots.clone(), &reservations, false);
        assert!(!hidden[0].is_available);
        assert!(hidden[0].occupant.is_none());

        let shown = merge_availability(slots, &reservations, true);
        let occupant = shown[0].occupant.as_ref().unwrap();
        assert_eq!(occupant.requester_id, "user-7");
    }

    #[test]
    fn other_court_or_date_does_not_block() {
        let slots = vec![slot(480)];
        let mut other_court = reservation(480, ReservationStatus::Confirmed);
        other_court.court_id = "court-2".to_string();
        let mut other_date = reservation(480, ReservationStatus::Confirmed);
        other_date.date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        let merged = merge_availability(slots, &[other_court, other_date], false);
        assert!(merged[0].is_available);
    }
}
