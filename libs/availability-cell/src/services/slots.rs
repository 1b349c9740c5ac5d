// libs/availability-cell/src/services/slots.rs
//
// Pure slot arithmetic: session validation, interval tiling and the
// regeneration merge. No I/O here; the booking and schedule services call
// into these with whatever they loaded from the store.

use std::collections::HashMap;

use tracing::debug;

use shared_utils::{format_time_12h, minutes_to_time, time_to_minutes};

use crate::models::{GeneratedSlot, Session, SessionStatus, SessionValidation, SlotPolicy};

/// Classify a session: Incomplete when either time is blank, Invalid when a
/// time does not parse or the range is not strictly increasing. Only Valid
/// sessions contribute slots.
pub fn validate_session(session: &Session) -> SessionValidation {
    if session.start_time.is_empty() || session.end_time.is_empty() {
        return SessionValidation {
            session_id: session.id,
            status: SessionStatus::Incomplete,
            reason: Some("start and end time are both required".to_string()),
        };
    }

    let start = match time_to_minutes(&session.start_time) {
        Ok(m) => m,
        Err(e) => {
            return SessionValidation {
                session_id: session.id,
                status: SessionStatus::Invalid,
                reason: Some(e.to_string()),
            }
        }
    };
    let end = match time_to_minutes(&session.end_time) {
        Ok(m) => m,
        Err(e) => {
            return SessionValidation {
                session_id: session.id,
                status: SessionStatus::Invalid,
                reason: Some(e.to_string()),
            }
        }
    };

    if start >= end {
        return SessionValidation {
            session_id: session.id,
            status: SessionStatus::Invalid,
            reason: Some("start time must be before end time".to_string()),
        };
    }

    SessionValidation {
        session_id: session.id,
        status: SessionStatus::Valid,
        reason: None,
    }
}

/// Tile every valid session into fixed-duration slots.
///
/// The tiling is left-closed right-open and non-overlapping: starting at the
/// session start, a slot is emitted while `current + duration <= end`, so a
/// span that is not an exact multiple of the duration drops the trailing
/// remainder. Sessions that fail validation contribute zero slots and are
/// returned in the validation report instead.
pub fn generate_slots(
    sessions: &[Session],
    policy: &SlotPolicy,
) -> (Vec<GeneratedSlot>, Vec<SessionValidation>) {
    let mut slots = Vec::new();
    let mut validations = Vec::with_capacity(sessions.len());

    for session in sessions {
        let validation = validate_session(session);
        let valid = validation.status == SessionStatus::Valid;
        validations.push(validation);
        if !valid {
            continue;
        }

        // Safe after validation.
        let start = time_to_minutes(&session.start_time).unwrap_or(0);
        let end = time_to_minutes(&session.end_time).unwrap_or(0);
        let duration = session.duration_minutes;
        if duration == 0 {
            continue;
        }

        let capacity = policy.capacity_for(duration);
        let mut current = start;

        while current + duration <= end {
            let slot_end = current + duration;
            let start_time = minutes_to_time(current);
            let end_time = minutes_to_time(slot_end);
            let start_display = format_time_12h(&start_time).unwrap_or_else(|_| start_time.clone());
            let end_display = format_time_12h(&end_time).unwrap_or_else(|_| end_time.clone());

            slots.push(GeneratedSlot {
                slot_id: format!("slot_{}_{}", session.id, current),
                session_id: session.id,
                start_time,
                end_time,
                start_display,
                end_display,
                duration_minutes: duration,
                capacity,
                booked_count: 0,
                patient_ids: Vec::new(),
            });

            current += duration;
        }
    }

    debug!(
        "Generated {} slots from {} sessions",
        slots.len(),
        sessions.len()
    );
    (slots, validations)
}

/// Reattach booking data across regeneration.
///
/// Slot ids are stable (session id + start offset), so a slot that survives
/// regeneration keeps its booked count and patient list instead of being
/// reset. Bookings on slots whose id no longer exists are dropped with the
/// slot. If a policy change shrank the capacity under an id that kept its
/// bookings, the carried list is truncated so `booked_count <= capacity`
/// still holds.
pub fn merge_bookings(previous: &[GeneratedSlot], mut regenerated: Vec<GeneratedSlot>) -> Vec<GeneratedSlot> {
    let prior: HashMap<&str, &GeneratedSlot> = previous
        .iter()
        .map(|slot| (slot.slot_id.as_str(), slot))
        .collect();

    for slot in &mut regenerated {
        if let Some(old) = prior.get(slot.slot_id.as_str()) {
            let mut patient_ids = old.patient_ids.clone();
            patient_ids.truncate(slot.capacity as usize);
            slot.booked_count = patient_ids.len() as u32;
            slot.patient_ids = patient_ids;
        }
    }

    regenerated
}
