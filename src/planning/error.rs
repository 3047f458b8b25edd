use thiserror::Error;

/// Input rejected before any session is generated
#[derive(Debug, Error, PartialEq)]
pub enum PlanningError {
    #[error("slot {slot_id}: invalid time '{value}' (expected HH:MM)")]
    InvalidTime { slot_id: String, value: String },

    #[error("slot {slot_id}: end time {end} is not after start time {start}")]
    EmptyTimeRange {
        slot_id: String,
        start: String,
        end: String,
    },

    #[error("slot {slot_id}: day of week {day} is outside 1-7")]
    InvalidDayOfWeek { slot_id: String, day: u8 },

    #[error("duplicate subject id '{0}'")]
    DuplicateSubject(String),
}
