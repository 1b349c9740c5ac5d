use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_store::SchedulerState;

use crate::handlers;

pub fn appointment_routes(state: Arc<SchedulerState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/reschedule", post(handlers::reschedule_appointment))
        .route("/{appointment_id}/confirm", post(handlers::confirm_appointment))
        .route("/{appointment_id}", delete(handlers::cancel_appointment))
        .with_state(state)
}

pub fn calendar_routes(state: Arc<SchedulerState>) -> Router {
    Router::new()
        .route("/{doctor_id}", get(handlers::get_week_grid))
        .with_state(state)
}
