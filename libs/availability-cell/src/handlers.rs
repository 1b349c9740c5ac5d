use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::SchedulerState;

use crate::models::{BookSlotRequest, CancelBookingRequest, CreateSessionRequest, UpdateSessionRequest};
use crate::services::{booking::BookingService, schedule::ScheduleService};

#[axum::debug_handler]
pub async fn list_sessions(
    State(state): State<Arc<SchedulerState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let sessions = service.list_sessions(&doctor_id).await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "sessions": sessions,
        "total": sessions.len()
    })))
}

#[axum::debug_handler]
pub async fn create_session(
    State(state): State<Arc<SchedulerState>>,
    Path(doctor_id): Path<String>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let session = service.create_session(&doctor_id, request).await?;

    Ok(Json(json!(session)))
}

#[axum::debug_handler]
pub async fn update_session(
    State(state): State<Arc<SchedulerState>>,
    Path((doctor_id, session_id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let session = service.update_session(&doctor_id, session_id, request).await?;

    Ok(Json(json!(session)))
}

#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<Arc<SchedulerState>>,
    Path((doctor_id, session_id)): Path<(String, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    service.delete_session(&doctor_id, session_id).await?;

    Ok(Json(json!({ "deleted": session_id })))
}

#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<SchedulerState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let response = service.generate_slots(&doctor_id).await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "slots": response.slots,
        "validations": response.validations,
        "total_slots": response.slots.len()
    })))
}

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<SchedulerState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let slots = service.list_slots(&doctor_id).await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<SchedulerState>>,
    Path((doctor_id, slot_id)): Path<(String, String)>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let confirmation = service.book_slot(&doctor_id, &slot_id, request).await?;

    Ok(Json(json!(confirmation)))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<SchedulerState>>,
    Path((doctor_id, slot_id)): Path<(String, String)>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    service
        .cancel_booking(&doctor_id, &slot_id, &request.patient_id)
        .await?;

    Ok(Json(json!({
        "slot_id": slot_id,
        "released": request.patient_id
    })))
}
