use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

/// Kind of work planned for a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    #[default]
    Revision,
    Redaction,
    Retapage,
    Exercices,
    #[serde(other)]
    Other,
}

/// A subject to study, as collected upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
    pub exam_date: String, // "YYYY-MM-DD"
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub current_progress: f64, // 0-100
    #[serde(rename = "type", default)]
    pub subject_type: SubjectType,
}

fn default_coefficient() -> f64 {
    1.0
}

/// A recurring weekly availability window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub day_of_week: u8, // 1 = Monday .. 7 = Sunday
    pub start_time: String, // "HH:MM"
    pub end_time: String,
    #[serde(default = "default_available")]
    pub available: bool, // carried through, never filtered on
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredStudyTime {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Flexible,
}

/// Study preferences. Accepted with every request but not applied by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub preferred_study_time: PreferredStudyTime,
    pub max_session_duration: u32, // minutes
    pub break_between_sessions: u32, // minutes
    pub weekend_study: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_study_time: PreferredStudyTime::Flexible,
            max_session_duration: 120,
            break_between_sessions: 15,
            weekend_study: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningRequest {
    pub subjects: Vec<Subject>,
    pub available_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Subject augmented with its computed scores for one planning run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedSubject {
    #[serde(flatten)]
    pub subject: Subject,
    /// `None` when the exam date could not be parsed
    pub days_until_exam: Option<i64>,
    pub urgency_score: f64,
    pub priority: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPriority {
    High,
    Medium,
    Low,
}

impl SessionPriority {
    pub fn from_urgency(urgency_score: f64) -> Self {
        if urgency_score > 0.7 {
            SessionPriority::High
        } else if urgency_score > 0.4 {
            SessionPriority::Medium
        } else {
            SessionPriority::Low
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SessionPriority::High => "🔥",
            SessionPriority::Medium => "⚠️",
            SessionPriority::Low => "📚",
        }
    }
}

/// A concrete study session placed on the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSession {
    pub id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub date: String, // "YYYY-MM-DD"
    pub start_time: String,
    pub end_time: String,
    pub duration: i64, // minutes
    #[serde(rename = "type")]
    pub session_type: SubjectType,
    pub priority: SessionPriority,
    pub description: String,
}

/// Result of one full planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlanning {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub sessions: Vec<GeneratedSession>,
    pub total_hours: f64,
    pub subjects: Vec<Subject>,
    pub explanation: String,
}
