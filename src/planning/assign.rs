use chrono::NaiveDateTime;
use super::time_utils::{next_date_for_weekday, slot_duration_minutes};
use super::types::{GeneratedSession, PrioritizedSubject, SessionPriority, SubjectType, TimeSlot};

/// Templated description for a session of the given subject
pub fn describe_session(subject_type: SubjectType, subject_name: &str) -> String {
    match subject_type {
        SubjectType::Revision => format!("Révision intensive {} - Focus sur les points clés", subject_name),
        SubjectType::Exercices => format!("Exercices pratiques {} - Entraînement ciblé", subject_name),
        SubjectType::Redaction => format!("Rédaction {} - Préparation écrite", subject_name),
        SubjectType::Retapage => format!("Retapage cours {} - Consolidation", subject_name),
        SubjectType::Other => format!("Session {}", subject_name),
    }
}

/// Assigns one subject to every slot, cycling through `prioritized` in order.
///
/// Sessions come back in slot input order. Priority only decides which subject
/// lands on which slot position: every subject gets the same share of slots.
/// With no subjects, no sessions are produced.
///
/// Slots are expected to be validated beforehand; if not, a malformed time
/// yields a zero duration and an invalid weekday falls back to today's date.
pub fn assign_slots(
    prioritized: &[PrioritizedSubject],
    slots: &[TimeSlot],
    now: NaiveDateTime,
) -> Vec<GeneratedSession> {
    if prioritized.is_empty() {
        log::debug!("No subjects to assign, skipping {} slots", slots.len());
        return Vec::new();
    }

    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let entry = &prioritized[index % prioritized.len()];
            let subject = &entry.subject;

            let date = next_date_for_weekday(slot.day_of_week, now).unwrap_or_else(|| now.date());
            let duration = slot_duration_minutes(&slot.start_time, &slot.end_time).unwrap_or(0);

            log::debug!(
                "Slot {} (day {} {}-{}) -> {} on {}",
                slot.id, slot.day_of_week, slot.start_time, slot.end_time, subject.name, date
            );

            GeneratedSession {
                id: format!("session_{}", index),
                subject_id: subject.id.clone(),
                subject_name: subject.name.clone(),
                date: date.format("%Y-%m-%d").to_string(),
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                duration,
                session_type: subject.subject_type,
                priority: SessionPriority::from_urgency(entry.urgency_score),
                description: describe_session(subject.subject_type, &subject.name),
            }
        })
        .collect()
}
