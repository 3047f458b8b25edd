pub mod types;
pub mod error;
pub mod time_utils;
pub mod priority;
pub mod assign;
pub mod explain;

use std::collections::HashSet;
use chrono::NaiveDateTime;

pub use types::{
    GeneratedPlanning, GeneratedSession, PlanningRequest, Preferences, Subject, SubjectType, TimeSlot,
};
pub use error::PlanningError;
pub use priority::prioritize_subjects;
pub use assign::assign_slots;
pub use explain::{generate_explanation, total_hours};

use time_utils::{parse_time_to_minutes, slot_day_to_platform};

/// Checks a single slot: well-formed HH:MM bounds, end after start, weekday in 1-7
pub fn validate_slot(slot: &TimeSlot) -> Result<(), PlanningError> {
    if slot_day_to_platform(slot.day_of_week).is_none() {
        return Err(PlanningError::InvalidDayOfWeek {
            slot_id: slot.id.clone(),
            day: slot.day_of_week,
        });
    }

    let start = parse_time_to_minutes(&slot.start_time).ok_or_else(|| PlanningError::InvalidTime {
        slot_id: slot.id.clone(),
        value: slot.start_time.clone(),
    })?;
    let end = parse_time_to_minutes(&slot.end_time).ok_or_else(|| PlanningError::InvalidTime {
        slot_id: slot.id.clone(),
        value: slot.end_time.clone(),
    })?;

    if end <= start {
        return Err(PlanningError::EmptyTimeRange {
            slot_id: slot.id.clone(),
            start: slot.start_time.clone(),
            end: slot.end_time.clone(),
        });
    }

    Ok(())
}

/// Rejects malformed input before any session is generated.
/// Empty subject or slot lists are valid and simply produce no sessions.
pub fn validate_request(request: &PlanningRequest) -> Result<(), PlanningError> {
    let mut seen = HashSet::new();
    for subject in &request.subjects {
        if !seen.insert(subject.id.as_str()) {
            return Err(PlanningError::DuplicateSubject(subject.id.clone()));
        }
    }

    for slot in &request.available_slots {
        validate_slot(slot)?;
    }

    Ok(())
}

/// Runs the whole pipeline: validate, rank, assign, explain, and bundle the result.
///
/// `now` is the local wall-clock instant the planning is computed for.
/// Preferences are accepted but not applied.
pub fn generate_planning(request: &PlanningRequest, now: NaiveDateTime) -> Result<GeneratedPlanning, PlanningError> {
    validate_request(request)?;

    let prioritized = prioritize_subjects(&request.subjects, now);
    let sessions = assign_slots(&prioritized, &request.available_slots, now);
    let explanation = generate_explanation(&sessions, &request.subjects);
    let total_hours = total_hours(&sessions);

    log::info!(
        "Generated {} sessions for {} subjects ({:.1}h)",
        sessions.len(),
        request.subjects.len(),
        total_hours
    );

    Ok(GeneratedPlanning {
        id: now.and_utc().timestamp_millis().to_string(),
        name: format!("Planning IA du {}", now.format("%d/%m/%Y")),
        created_at: now,
        sessions,
        total_hours,
        subjects: request.subjects.clone(),
        explanation,
    })
}
