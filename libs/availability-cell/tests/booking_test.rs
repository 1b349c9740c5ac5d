// libs/availability-cell/tests/booking_test.rs
//
// Booking and session orchestration against a mocked REST store.

use assert_matches::assert_matches;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::models::{BookSlotRequest, CreateSessionRequest, SchedulingError};
use availability_cell::services::booking::BookingService;
use availability_cell::services::schedule::ScheduleService;
use shared_config::AppConfig;
use shared_store::SchedulerState;

fn state_for(server: &MockServer) -> Arc<SchedulerState> {
    Arc::new(SchedulerState::new(AppConfig::with_store_url(server.uri())))
}

fn schedule_json(doctor_id: &str, session_id: Uuid, booked: &[&str], capacity: u32) -> serde_json::Value {
    json!({
        "doctor_id": doctor_id,
        "sessions": [{
            "id": session_id,
            "start_time": "09:00",
            "end_time": "10:00",
            "duration_minutes": 15,
        }],
        "slots": [{
            "slot_id": format!("slot_{}_540", session_id),
            "session_id": session_id,
            "start_time": "09:00",
            "end_time": "09:15",
            "start_display": "9:00 AM",
            "end_display": "9:15 AM",
            "duration_minutes": 15,
            "capacity": capacity,
            "booked_count": booked.len(),
            "patient_ids": booked,
        }],
        "updated_at": Utc::now().to_rfc3339(),
    })
}

fn book_request(patient_id: &str) -> BookSlotRequest {
    BookSlotRequest {
        patient_id: patient_id.to_string(),
        patient_name: "John Doe".to_string(),
        doctor_name: Some("Dr. Ada Osei".to_string()),
        date: NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
        appointment_type: Some("consultation".to_string()),
        phone: Some("+233201234567".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn booking_a_slot_persists_the_schedule_and_creates_an_appointment() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();
    let slot_id = format!("slot_{}_540", session_id);

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json("doc-1", session_id, &[], 4)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .and(body_partial_json(json!({
            "slots": [{ "slot_id": slot_id, "booked_count": 1, "patient_ids": ["pat-1"] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({
            "doctor_id": "doc-1",
            "patient_id": "pat-1",
            "status": "pending",
            "start_time": "09:00",
            "end_time": "09:15",
            "day": "Monday",
            "slot_id": slot_id,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    let confirmation = service
        .book_slot("doc-1", &slot_id, book_request("pat-1"))
        .await
        .unwrap();

    assert_eq!(confirmation.slot_id, slot_id);
    assert_eq!(confirmation.booked_count, 1);
    assert_eq!(confirmation.capacity, 4);
    assert_eq!(confirmation.booking_token.len(), 8);
}

#[tokio::test]
async fn concurrent_bookings_on_the_last_seat_yield_one_confirmation_and_one_rejection() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();
    let slot_id = format!("slot_{}_540", session_id);

    let slot = |booked: &[&str]| {
        json!({
            "slot_id": slot_id,
            "session_id": session_id,
            "start_time": "09:00",
            "end_time": "10:00",
            "start_display": "9:00 AM",
            "end_display": "10:00 AM",
            "duration_minutes": 60,
            "capacity": 1,
            "booked_count": booked.len(),
            "patient_ids": booked,
        })
    };
    let schedule = |booked: &[&str]| {
        json!({
            "doctor_id": "doc-1",
            "sessions": [{
                "id": session_id,
                "start_time": "09:00",
                "end_time": "10:00",
                "duration_minutes": 60,
            }],
            "slots": [slot(booked)],
            "updated_at": Utc::now().to_rfc3339(),
        })
    };

    // The doctor lock serializes the two read-modify-write cycles, so the
    // store sees them strictly in turn: the first read finds the seat free,
    // the second read sees the winner's write. Mounted in order; the free
    // response expires after one use.
    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule(&[])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule(&["pat-1"])))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server);
    let first = BookingService::new(Arc::clone(&state));
    let second = BookingService::new(Arc::clone(&state));

    let (a, b) = tokio::join!(
        first.book_slot("doc-1", &slot_id, book_request("pat-1")),
        second.book_slot("doc-1", &slot_id, book_request("pat-2")),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(SchedulingError::CapacityExceeded { .. })))
            .count(),
        1
    );

    let confirmation = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
    assert_eq!(confirmation.booked_count, 1);
    assert_eq!(confirmation.capacity, 1);
}

#[tokio::test]
async fn booking_a_full_slot_is_rejected_without_writes() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();
    let slot_id = format!("slot_{}_540", session_id);

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json(
            "doc-1",
            session_id,
            &["pat-a", "pat-b", "pat-c", "pat-d"],
            4,
        )))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    let err = service
        .book_slot("doc-1", &slot_id, book_request("pat-e"))
        .await
        .unwrap_err();

    assert_matches!(err, SchedulingError::CapacityExceeded { .. });
}

#[tokio::test]
async fn booking_an_unknown_slot_is_not_found() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json("doc-1", session_id, &[], 4)))
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    let err = service
        .book_slot("doc-1", "slot_nonexistent_0", book_request("pat-1"))
        .await
        .unwrap_err();

    assert_matches!(err, SchedulingError::SlotNotFound { .. });
}

#[tokio::test]
async fn an_unknown_doctor_reads_as_an_empty_schedule() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    let err = service
        .book_slot("ghost", "slot_x_0", book_request("pat-1"))
        .await
        .unwrap_err();

    // Empty schedule, so the slot is simply absent.
    assert_matches!(err, SchedulingError::SlotNotFound { .. });
}

#[tokio::test]
async fn store_outage_surfaces_as_a_store_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    let err = service
        .book_slot("doc-1", "slot_x_0", book_request("pat-1"))
        .await
        .unwrap_err();

    assert_matches!(err, SchedulingError::Store(_));
}

#[tokio::test]
async fn cancelling_a_booking_releases_the_seat() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();
    let slot_id = format!("slot_{}_540", session_id);

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json(
            "doc-1",
            session_id,
            &["pat-1", "pat-2"],
            4,
        )))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .and(body_partial_json(json!({
            "slots": [{ "slot_id": slot_id, "booked_count": 1, "patient_ids": ["pat-2"] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    service.cancel_booking("doc-1", &slot_id, "pat-1").await.unwrap();
}

#[tokio::test]
async fn cancelling_a_booking_the_patient_never_made_is_an_error() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();
    let slot_id = format!("slot_{}_540", session_id);

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json("doc-1", session_id, &["pat-2"], 4)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let service = BookingService::new(state_for(&server));
    let err = service
        .cancel_booking("doc-1", &slot_id, "pat-1")
        .await
        .unwrap_err();

    assert_matches!(err, SchedulingError::BookingNotFound { .. });
}

// ==============================================================================
// SESSION CRUD AND REGENERATION THROUGH THE STORE
// ==============================================================================

#[tokio::test]
async fn creating_a_session_rejects_durations_outside_the_policy() {
    let server = MockServer::start().await;

    let service = ScheduleService::new(state_for(&server));
    let err = service
        .create_session(
            "doc-1",
            CreateSessionRequest {
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
                duration_minutes: 25,
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, SchedulingError::InvalidSession(_));
    // Rejected before any store traffic.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn creating_a_session_appends_and_persists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .and(body_partial_json(json!({
            "doctor_id": "doc-1",
            "sessions": [{ "start_time": "09:00", "end_time": "12:00", "duration_minutes": 30 }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ScheduleService::new(state_for(&server));
    let session = service
        .create_session(
            "doc-1",
            CreateSessionRequest {
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
                duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    assert_eq!(session.duration_minutes, 30);
}

#[tokio::test]
async fn regeneration_keeps_bookings_on_surviving_slots() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();
    let slot_id = format!("slot_{}_540", session_id);

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json("doc-1", session_id, &["pat-1"], 4)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ScheduleService::new(state_for(&server));
    let response = service.generate_slots("doc-1").await.unwrap();

    // 09:00-10:00 at 15 minutes tiles into four slots; the stored booking
    // reattaches to the slot whose id survived.
    assert_eq!(response.slots.len(), 4);
    let survivor = response.slots.iter().find(|s| s.slot_id == slot_id).unwrap();
    assert_eq!(survivor.booked_count, 1);
    assert_eq!(survivor.patient_ids, vec!["pat-1"]);
    assert!(response
        .slots
        .iter()
        .filter(|s| s.slot_id != slot_id)
        .all(|s| s.booked_count == 0));

    assert_eq!(response.validations.len(), 1);
}

#[tokio::test]
async fn deleting_a_session_removes_its_slots() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json("doc-1", session_id, &[], 4)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/doctor_schedules/doc-1"))
        .and(body_partial_json(json!({ "sessions": [], "slots": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ScheduleService::new(state_for(&server));
    service.delete_session("doc-1", session_id).await.unwrap();
}

#[tokio::test]
async fn deleting_an_unknown_session_is_not_found() {
    let server = MockServer::start().await;
    let session_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/doctor_schedules/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json("doc-1", session_id, &[], 4)))
        .mount(&server)
        .await;

    let service = ScheduleService::new(state_for(&server));
    let err = service.delete_session("doc-1", Uuid::new_v4()).await.unwrap_err();

    assert_matches!(err, SchedulingError::SessionNotFound);
}
