use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_store::SchedulerState;

use crate::handlers;

pub fn availability_routes(state: Arc<SchedulerState>) -> Router {
    Router::new()
        // Availability session management
        .route("/{doctor_id}/sessions", get(handlers::list_sessions))
        .route("/{doctor_id}/sessions", post(handlers::create_session))
        .route("/{doctor_id}/sessions/{session_id}", put(handlers::update_session))
        .route("/{doctor_id}/sessions/{session_id}", delete(handlers::delete_session))
        // Slot generation and booking
        .route("/{doctor_id}/generate-slots", post(handlers::generate_slots))
        .route("/{doctor_id}/slots", get(handlers::list_slots))
        .route("/{doctor_id}/slots/{slot_id}/book", post(handlers::book_slot))
        .route("/{doctor_id}/slots/{slot_id}/cancel-booking", post(handlers::cancel_booking))
        .with_state(state)
}
