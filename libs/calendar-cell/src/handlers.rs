use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::SchedulerState;

use crate::models::{AppointmentQuery, CalendarQuery, RescheduleRequest};
use crate::services::appointments::AppointmentService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<SchedulerState>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state);
    let appointments = service.list(query.doctor_id.as_deref()).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<SchedulerState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state);
    let appointment = service.get(appointment_id).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<SchedulerState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state);
    let appointment = service.reschedule(appointment_id, request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<SchedulerState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state);
    let appointment = service.confirm(appointment_id).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<SchedulerState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state);
    service.cancel(appointment_id).await?;

    Ok(Json(json!({ "cancelled": appointment_id })))
}

#[axum::debug_handler]
pub async fn get_week_grid(
    State(state): State<Arc<SchedulerState>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state);
    let grid = service.week_grid(&doctor_id, query.week_start).await?;

    Ok(Json(json!(grid)))
}
