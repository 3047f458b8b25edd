use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use super::time_utils::{french_weekday_name, parse_date};
use super::types::{GeneratedSession, Subject};

/// Total planned time in hours
pub fn total_hours(sessions: &[GeneratedSession]) -> f64 {
    sessions.iter().map(|s| s.duration).sum::<i64>() as f64 / 60.0
}

/// Number of distinct subjects that received at least one session
pub fn distinct_subject_count(sessions: &[GeneratedSession]) -> usize {
    sessions
        .iter()
        .map(|s| s.subject_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Groups sessions by date string, keeping dates in first-seen order
/// (not calendar order) and sessions in assignment order within a day.
pub fn group_by_date(sessions: &[GeneratedSession]) -> Vec<(&str, Vec<&GeneratedSession>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_date: HashMap<&str, Vec<&GeneratedSession>> = HashMap::new();

    for session in sessions {
        let date = session.date.as_str();
        if !by_date.contains_key(date) {
            order.push(date);
        }
        by_date.entry(date).or_default().push(session);
    }

    order
        .into_iter()
        .map(|date| {
            let day_sessions = by_date.remove(date).unwrap_or_default();
            (date, day_sessions)
        })
        .collect()
}

fn day_header(date: &str) -> String {
    match parse_date(date) {
        Some(d) => french_weekday_name(d).to_string(),
        None => date.to_string(),
    }
}

/// Renders the chat-ready narrative for a generated planning.
///
/// `_subjects` is the original subject list; the summary only counts subjects
/// that actually received sessions.
pub fn generate_explanation(sessions: &[GeneratedSession], _subjects: &[Subject]) -> String {
    let mut explanation = String::from("🎯 Planning optimisé généré ! Voici ce que j'ai prévu :\n\n");

    // Writing into a String cannot fail
    for (date, day_sessions) in group_by_date(sessions) {
        let _ = writeln!(explanation, "📅 **{}** :", day_header(date));
        for session in day_sessions {
            let _ = writeln!(
                explanation,
                "{} {}-{} : {}",
                session.priority.emoji(),
                session.start_time,
                session.end_time,
                session.description
            );
        }
        explanation.push('\n');
    }

    explanation.push_str("💡 **Mes conseils** :\n");
    let _ = writeln!(
        explanation,
        "• {:.1}h de travail réparties sur {} matières",
        total_hours(sessions),
        distinct_subject_count(sessions)
    );
    explanation.push_str("• J'ai priorisé les matières avec examens proches\n");
    explanation.push_str("• Sessions adaptées à tes créneaux disponibles\n");
    explanation.push_str("• Alternance des types de travail pour varier\n\n");
    explanation.push_str("🚀 Prêt à commencer ? Tu peux ajuster les créneaux si besoin !");

    explanation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::types::{SessionPriority, SubjectType};

    fn session(index: usize, subject_id: &str, date: &str, duration: i64, priority: SessionPriority) -> GeneratedSession {
        GeneratedSession {
            id: format!("session_{}", index),
            subject_id: subject_id.to_string(),
            subject_name: subject_id.to_string(),
            date: date.to_string(),
            start_time: "14:00".to_string(),
            end_time: "16:00".to_string(),
            duration,
            session_type: SubjectType::Revision,
            priority,
            description: format!("Session {}", subject_id),
        }
    }

    fn sample() -> Vec<GeneratedSession> {
        vec![
            session(0, "math", "2025-01-20", 120, SessionPriority::High),
            session(1, "hist", "2025-01-14", 90, SessionPriority::Medium),
            session(2, "math", "2025-01-20", 60, SessionPriority::Low),
        ]
    }

    #[test]
    fn test_group_by_date_keeps_first_seen_order() {
        let sessions = sample();
        let groups = group_by_date(&sessions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "2025-01-20");
        assert_eq!(groups[1].0, "2025-01-14");
        let first_day: Vec<&str> = groups[0].1.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(first_day, vec!["session_0", "session_2"]);
    }

    #[test]
    fn test_explanation_headers_and_lines() {
        let explanation = generate_explanation(&sample(), &[]);
        assert_eq!(explanation.matches("📅 **").count(), 2);
        assert_eq!(explanation.matches(" : Session ").count(), 3);

        // Non-chronological order is preserved
        let monday = explanation.find("**Lundi**").unwrap();
        let tuesday = explanation.find("**Mardi**").unwrap();
        assert!(monday < tuesday);

        assert!(explanation.contains("🔥 14:00-16:00 : Session math"));
        assert!(explanation.contains("⚠️ 14:00-16:00 : Session hist"));
        assert!(explanation.contains("📚 14:00-16:00 : Session math"));
    }

    #[test]
    fn test_summary_totals() {
        let explanation = generate_explanation(&sample(), &[]);
        assert!(explanation.contains("• 4.5h de travail réparties sur 2 matières"));
        assert_eq!(distinct_subject_count(&sample()), 2);
        assert!((total_hours(&sample()) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sessions() {
        let explanation = generate_explanation(&[], &[]);
        assert!(!explanation.contains("📅"));
        assert!(explanation.contains("• 0.0h de travail réparties sur 0 matières"));
    }
}
