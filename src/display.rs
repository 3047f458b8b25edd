use std::fs::File;
use std::io::Write;
use crate::planning::{GeneratedPlanning, GeneratedSession};
use crate::planning::types::SessionPriority;

fn priority_label(priority: SessionPriority) -> &'static str {
    match priority {
        SessionPriority::High => "HIGH",
        SessionPriority::Medium => "MEDIUM",
        SessionPriority::Low => "LOW",
    }
}

/// Formats a session as a single line: date time-range subject (duration, priority)
pub fn format_session_line(session: &GeneratedSession) -> String {
    format!(
        "{} {}-{} {} ({} min, {})",
        session.date,
        session.start_time,
        session.end_time,
        session.subject_name,
        session.duration,
        priority_label(session.priority)
    )
}

/// Writes a planning to a file: header, one line per session, then the explanation
pub fn write_planning_to_file(
    planning: &GeneratedPlanning,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** {} **", planning.name)?;
    for session in &planning.sessions {
        writeln!(file, "{}", format_session_line(session))?;
    }
    writeln!(file)?;
    writeln!(file, "{}", planning.explanation)?;

    Ok(())
}

/// Prints a planning in a readable format
pub fn print_planning(planning: &GeneratedPlanning) {
    println!("\n=== {} ===", planning.name);
    println!("Total sessions scheduled: {}", planning.sessions.len());
    println!("Total hours: {:.1}", planning.total_hours);

    let unplanned: Vec<&str> = planning
        .subjects
        .iter()
        .filter(|subject| !planning.sessions.iter().any(|s| s.subject_id == subject.id))
        .map(|subject| subject.name.as_str())
        .collect();
    if !unplanned.is_empty() {
        println!("⚠️  Subjects without a session ({}):", unplanned.len());
        for name in unplanned {
            println!("  - {}", name);
        }
    }

    println!("\nSessions:");
    for session in &planning.sessions {
        println!("  {} -> {}", session.id, format_session_line(session));
    }

    println!("\n{}", planning.explanation);
}
