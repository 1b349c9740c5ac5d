use std::sync::Arc;

use axum::{routing::get, Router};

use availability_cell::router::availability_routes;
use calendar_cell::router::{appointment_routes, calendar_routes};
use shared_store::SchedulerState;

pub fn create_router(state: Arc<SchedulerState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Scheduler API is running!" }))
        .nest("/doctors", availability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/calendar", calendar_routes(state))
}
