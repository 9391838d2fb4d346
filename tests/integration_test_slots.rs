mod common;

use axum::http::StatusCode;
use chrono::{Duration, Timelike, Utc};
use common::{all_week, parse_body, TestApp};
use serde_json::json;

fn future_date(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn full_day_grid_lists_every_session() {
    let app = TestApp::new().await;
    let court = app.create_court("Center Court").await;
    let court_id = court["id"].as_str().unwrap();

    let date = future_date(7);
    let res = app.get(&format!("/api/v1/courts/{}/slots?date={}", court_id, date)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["date"].as_str().unwrap(), date);

    let slots = body["slots"].as_array().unwrap();
    // 08:00-22:00 with 90 minute sessions leaves room for 9 full ones.
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[0]["start_time"], "08:00");
    assert_eq!(slots[8]["start_time"], "20:00");
    for slot in slots {
        assert_eq!(slot["duration_min"], 90);
        assert_eq!(slot["is_available"], true);
        assert!(slot.get("occupant").is_none());
    }
}

#[tokio::test]
async fn closed_day_yields_empty_grid() {
    let app = TestApp::new().await;
    let court = app
        .create_court_with("Winter Court", "UTC", 90, json!({}))
        .await;

    let res = app
        .get(&format!(
            "/api/v1/courts/{}/slots?date={}",
            court["id"].as_str().unwrap(),
            future_date(7)
        ))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert!(body["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn window_too_small_for_one_session_yields_empty_grid() {
    let app = TestApp::new().await;
    let court = app
        .create_court_with("Tiny Court", "UTC", 90, all_week("08:00", "09:00"))
        .await;

    let res = app
        .get(&format!(
            "/api/v1/courts/{}/slots?date={}",
            court["id"].as_str().unwrap(),
            future_date(7)
        ))
        .await;
    let body = parse_body(res).await;
    assert!(body["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn overnight_window_wraps_past_midnight() {
    let app = TestApp::new().await;
    let court = app
        .create_court_with("Night Court", "UTC", 60, all_week("22:00", "02:00"))
        .await;

    let res = app
        .get(&format!(
            "/api/v1/courts/{}/slots?date={}",
            court["id"].as_str().unwrap(),
            future_date(7)
        ))
        .await;
    let body = parse_body(res).await;
    let starts: Vec<&str> = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start_time"].as_str().unwrap())
        .collect();
    assert_eq!(starts, vec!["22:00", "23:00", "00:00", "01:00"]);
}

#[tokio::test]
async fn today_grid_only_offers_starts_beyond_the_buffer() {
    let app = TestApp::new().await;
    // Open around the clock so the test works at any wall time.
    let court = app
        .create_court_with("All Day Court", "UTC", 60, all_week("00:00", "00:00"))
        .await;

    let now = Utc::now();
    let today = now.format("%Y-%m-%d").to_string();
    let res = app
        .get(&format!(
            "/api/v1/courts/{}/slots?date={}",
            court["id"].as_str().unwrap(),
            today
        ))
        .await;
    let body = parse_body(res).await;

    let cutoff_min = (now + Duration::minutes(30)).time().num_seconds_from_midnight() / 60;
    for slot in body["slots"].as_array().unwrap() {
        let label = slot["start_time"].as_str().unwrap();
        let minutes: u32 =
            label[..2].parse::<u32>().unwrap() * 60 + label[3..].parse::<u32>().unwrap();
        assert!(
            minutes > cutoff_min,
            "slot {} offered inside the buffer (cutoff {})",
            label,
            cutoff_min
        );
    }
}

#[tokio::test]
async fn booked_slot_shows_unavailable_without_occupant_details() {
    let app = TestApp::new().await;
    let court = app.create_court("Center Court").await;
    let court_id = court["id"].as_str().unwrap();
    let date = future_date(7);

    let res = app
        .post(
            &format!("/api/v1/courts/{}/reservations", court_id),
            json!({ "date": date, "time": "09:30", "requester_id": "user-1" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(app.get(&format!("/api/v1/courts/{}/slots?date={}", court_id, date)).await).await;
    let slots = body["slots"].as_array().unwrap();
    let taken = slots.iter().find(|s| s["start_time"] == "09:30").unwrap();
    assert_eq!(taken["is_available"], false);
    assert!(taken.get("occupant").is_none());
    assert_eq!(slots.iter().filter(|s| s["is_available"] == true).count(), 8);
}

#[tokio::test]
async fn managers_see_who_holds_a_slot() {
    let app = TestApp::new().await;
    let court = app.create_court("Center Court").await;
    let court_id = court["id"].as_str().unwrap();
    let date = future_date(7);

    app.post(
        &format!("/api/v1/courts/{}/reservations", court_id),
        json!({
            "date": date, "time": "11:00", "requester_id": "user-7",
            "requester_kind": "TEAM", "team_id": "team-3"
        }),
    )
    .await;

    let uri = format!("/api/v1/courts/{}/slots?date={}", court_id, date);
    let body = parse_body(app.get_as(&uri, Some("manager")).await).await;
    let taken = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start_time"] == "11:00")
        .unwrap()
        .clone();

    assert_eq!(taken["is_available"], false);
    assert_eq!(taken["occupant"]["requester_id"], "user-7");
    assert_eq!(taken["occupant"]["team_id"], "team-3");
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let app = TestApp::new().await;
    let court = app.create_court("Center Court").await;

    let res = app
        .get(&format!(
            "/api/v1/courts/{}/slots?date=07-2026-01",
            court["id"].as_str().unwrap()
        ))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_court_is_not_found() {
    let app = TestApp::new().await;
    let res = app
        .get(&format!("/api/v1/courts/missing/slots?date={}", future_date(1)))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
