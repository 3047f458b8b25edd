use chrono::NaiveDateTime;
use super::time_utils::{days_until, parse_date};
use super::types::{PrioritizedSubject, Subject};

/// Days before the exam at which urgency starts rising above the floor
pub const URGENCY_HORIZON_DAYS: f64 = 30.0;
pub const MIN_URGENCY: f64 = 0.1;
pub const MAX_URGENCY: f64 = 1.0;

const URGENCY_WEIGHT: f64 = 0.7;
const COEFFICIENT_WEIGHT: f64 = 0.3;

/// Urgency in [0.1, 1.0]: floor at 30+ days out, saturated on exam day or later
pub fn urgency_score(days_until_exam: i64) -> f64 {
    ((URGENCY_HORIZON_DAYS - days_until_exam as f64) / URGENCY_HORIZON_DAYS)
        .clamp(MIN_URGENCY, MAX_URGENCY)
}

/// Blends urgency with the raw (unnormalized) coefficient.
/// Non-positive coefficients count as 1.
pub fn blended_priority(urgency_score: f64, coefficient: f64) -> f64 {
    let coefficient = if coefficient > 0.0 { coefficient } else { 1.0 };
    urgency_score * URGENCY_WEIGHT + coefficient * COEFFICIENT_WEIGHT
}

/// Scores a single subject relative to `now`
pub fn prioritize_subject(subject: &Subject, now: NaiveDateTime) -> PrioritizedSubject {
    let days_until_exam = parse_date(&subject.exam_date).and_then(|date| days_until(date, now));

    let urgency_score = match days_until_exam {
        Some(days) => urgency_score(days),
        None => {
            log::warn!(
                "Subject {} has an unreadable exam date '{}', using minimum urgency",
                subject.id, subject.exam_date
            );
            MIN_URGENCY
        }
    };

    PrioritizedSubject {
        subject: subject.clone(),
        days_until_exam,
        urgency_score,
        priority: blended_priority(urgency_score, subject.coefficient),
    }
}

/// Scores every subject and orders them by priority (highest first).
/// Subjects with equal priority keep their input order.
pub fn prioritize_subjects(subjects: &[Subject], now: NaiveDateTime) -> Vec<PrioritizedSubject> {
    let mut prioritized: Vec<PrioritizedSubject> = subjects
        .iter()
        .map(|subject| prioritize_subject(subject, now))
        .collect();

    // Vec::sort_by is stable
    prioritized.sort_by(|a, b| b.priority.total_cmp(&a.priority));

    for p in &prioritized {
        log::debug!(
            "Ranked {} (days={:?}, urgency={:.3}, priority={:.3})",
            p.subject.name, p.days_until_exam, p.urgency_score, p.priority
        );
    }

    prioritized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::types::SubjectType;

    fn now() -> NaiveDateTime {
        parse_date("2025-01-10").unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn subject(id: &str, coefficient: f64, exam_date: &str) -> Subject {
        Subject {
            id: id.to_string(),
            name: id.to_uppercase(),
            coefficient,
            exam_date: exam_date.to_string(),
            estimated_hours: 8.0,
            current_progress: 0.0,
            subject_type: SubjectType::Revision,
        }
    }

    #[test]
    fn test_urgency_bounds() {
        assert_eq!(urgency_score(30), MIN_URGENCY);
        assert_eq!(urgency_score(45), MIN_URGENCY);
        assert_eq!(urgency_score(0), MAX_URGENCY);
        assert_eq!(urgency_score(-3), MAX_URGENCY);
        assert!((urgency_score(10) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_urgency_non_increasing() {
        let mut previous = f64::INFINITY;
        for days in -5..60 {
            let score = urgency_score(days);
            assert!(score <= previous, "urgency rose at {} days", days);
            previous = score;
        }
    }

    #[test]
    fn test_coefficient_dominates_and_zero_falls_back() {
        assert!((blended_priority(0.1, 5.0) - 1.57).abs() < 1e-9);
        assert_eq!(blended_priority(0.5, 0.0), blended_priority(0.5, 1.0));
    }

    #[test]
    fn test_negative_coefficient_counts_as_one() {
        assert_eq!(blended_priority(0.5, -3.0), blended_priority(0.5, 1.0));
        assert!(blended_priority(0.1, -3.0) > 0.0);
    }

    #[test]
    fn test_prioritize_sorts_descending() {
        let subjects = vec![
            subject("far", 1.0, "2025-03-01"),
            subject("near", 1.0, "2025-01-12"),
            subject("heavy", 4.0, "2025-03-01"),
        ];
        let ranked = prioritize_subjects(&subjects, now());
        let ids: Vec<&str> = ranked.iter().map(|p| p.subject.id.as_str()).collect();
        assert_eq!(ids, vec!["heavy", "near", "far"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }

    #[test]
    fn test_prioritize_is_stable_on_ties() {
        let subjects = vec![
            subject("a", 1.0, "2025-03-01"),
            subject("b", 1.0, "2025-04-01"),
            subject("c", 1.0, "2025-05-01"),
        ];
        // All three floor at minimum urgency with the same coefficient
        let ranked = prioritize_subjects(&subjects, now());
        let ids: Vec<&str> = ranked.iter().map(|p| p.subject.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_malformed_exam_date_uses_minimum_urgency() {
        let ranked = prioritize_subjects(&[subject("x", 1.0, "20 janvier")], now());
        assert_eq!(ranked[0].days_until_exam, None);
        assert_eq!(ranked[0].urgency_score, MIN_URGENCY);
        assert!(ranked[0].priority.is_finite());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let subjects = vec![subject("a", 2.0, "2025-01-20")];
        let ranked = prioritize_subjects(&subjects, now());
        assert_eq!(ranked[0].subject, subjects[0]);
        assert_eq!(ranked[0].days_until_exam, Some(10));
    }
}
