use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    CourtRepository, JobRepository, PaymentIntentRepository, ReservationRepository,
};
use crate::domain::services::payment_service::PaymentService;
use crate::domain::services::reservation_service::ReservationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub court_repo: Arc<dyn CourtRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub payment_intent_repo: Arc<dyn PaymentIntentRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub reservation_service: Arc<ReservationService>,
    pub payment_service: Arc<PaymentService>,
}
