use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{court, health, payment, reservation};
use crate::state::AppState;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Courts
        .route("/api/v1/courts", post(court::create_court).get(court::list_courts))
        .route("/api/v1/courts/{court_id}", get(court::get_court))
        .route("/api/v1/courts/{court_id}/slots", get(reservation::get_slots))

        // Reservations
        .route("/api/v1/courts/{court_id}/reservations", post(reservation::create_reservation))
        .route("/api/v1/reservations/{reservation_id}", get(reservation::get_reservation))
        .route("/api/v1/reservations/{reservation_id}/cancel", post(reservation::cancel_reservation))

        // Payments
        .route("/api/v1/reservations/{reservation_id}/payment-intent", post(payment::create_payment_intent))
        .route("/api/v1/payments/{intent_id}/confirm", post(payment::confirm_payment))
        .route("/api/v1/refunds/escalated", get(payment::list_escalated_refunds))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
