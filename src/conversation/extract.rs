use std::sync::OnceLock;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use crate::planning::time_utils::{minutes_to_time_string, parse_date};
use crate::planning::{Subject, SubjectType, TimeSlot};

const DAY_NAMES: [&str; 7] = ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"];

const MONTH_NAMES: [(&str, u32); 15] = [
    ("janvier", 1),
    ("février", 2),
    ("fevrier", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("août", 8),
    ("aout", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("décembre", 12),
    ("decembre", 12),
];

/// Word stems recognised as school subjects when no explicit exam date is given
const COMMON_SUBJECT_STEMS: [&str; 5] = ["math", "hist", "phys", "fran", "angl"];

fn iso_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\p{L}+)\s+(\d{4}-\d{2}-\d{2})").expect("valid regex"))
}

fn named_month_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\p{L}+)\s+examen\s+(\d{1,2})\s+(\p{L}+)").expect("valid regex"))
}

fn day_month_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\p{L}+)\s+le\s+(\d{1,2})/(\d{1,2})").expect("valid regex"))
}

fn day_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche)\b").expect("valid regex")
    })
}

fn time_range_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})(?:[h:](\d{2})?)?\s*(?:-|–|à)\s*(\d{1,2})(?:[h:](\d{2})?)?").expect("valid regex")
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exam date used when the user gave none: two weeks out, one more week per subject
pub fn default_exam_date(today: NaiveDate, index: usize) -> NaiveDate {
    today + Duration::days(14 + 7 * index as i64)
}

/// Resolves a day/month pair to the next occurrence on or after `today`
fn upcoming_date(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES.iter().find(|(m, _)| *m == lower).map(|(_, n)| *n)
}

fn new_subject(index: usize, name: &str, exam_date: NaiveDate) -> Subject {
    Subject {
        id: format!("subject_{}", index),
        name: capitalize(name),
        coefficient: 1.0,
        exam_date: exam_date.format("%Y-%m-%d").to_string(),
        estimated_hours: 8.0,
        current_progress: 0.0,
        subject_type: SubjectType::Revision,
    }
}

/// Subjects given with an explicit exam date, in message order
fn subjects_with_dates(message: &str, today: NaiveDate) -> Vec<(usize, String, NaiveDate)> {
    let mut found: Vec<(usize, String, NaiveDate)> = Vec::new();

    for caps in iso_pattern().captures_iter(message) {
        if let Some(date) = parse_date(&caps[2]) {
            found.push((caps.get(0).map_or(0, |m| m.start()), caps[1].to_string(), date));
        }
    }

    for caps in named_month_pattern().captures_iter(message) {
        let date = caps[2]
            .parse::<u32>()
            .ok()
            .zip(month_from_name(&caps[3]))
            .and_then(|(day, month)| upcoming_date(day, month, today));
        if let Some(date) = date {
            found.push((caps.get(0).map_or(0, |m| m.start()), caps[1].to_string(), date));
        }
    }

    for caps in day_month_pattern().captures_iter(message) {
        let day = caps[2].parse::<u32>().ok();
        let month = caps[3].parse::<u32>().ok();
        if let Some(date) = day.zip(month).and_then(|(d, m)| upcoming_date(d, m, today)) {
            found.push((caps.get(0).map_or(0, |m| m.start()), caps[1].to_string(), date));
        }
    }

    found.sort_by_key(|(position, _, _)| *position);
    found
}

/// Extracts subjects from a free-text message.
///
/// Tries explicit "<name> <date>" forms first, then well-known subject words,
/// then a plain comma/newline separated list. Falls back to a single
/// Mathematics subject when nothing usable is found.
pub fn parse_subjects_from_message(message: &str, today: NaiveDate) -> Vec<Subject> {
    let dated = subjects_with_dates(message, today);
    if !dated.is_empty() {
        return dated
            .into_iter()
            .enumerate()
            .map(|(index, (_, name, date))| new_subject(index, &name, date))
            .collect();
    }

    let mut subjects: Vec<Subject> = Vec::new();
    for word in message.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        if COMMON_SUBJECT_STEMS.iter().any(|stem| word.contains(stem)) {
            let index = subjects.len();
            subjects.push(new_subject(index, &word, default_exam_date(today, index)));
        }
    }
    if !subjects.is_empty() {
        return subjects;
    }

    let names: Vec<&str> = message
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| s.chars().count() > 2)
        .collect();
    for (index, name) in names.into_iter().enumerate() {
        subjects.push(new_subject(index, name, default_exam_date(today, index)));
    }
    if !subjects.is_empty() {
        return subjects;
    }

    vec![Subject {
        id: "subject_1".to_string(),
        name: "Mathématiques".to_string(),
        coefficient: 2.0,
        exam_date: default_exam_date(today, 0).format("%Y-%m-%d").to_string(),
        estimated_hours: 10.0,
        current_progress: 0.0,
        subject_type: SubjectType::Revision,
    }]
}

/// Slots used when the user's message contains no recognisable time range
pub fn default_slots() -> Vec<TimeSlot> {
    [(1, "14:00", "16:00"), (2, "09:00", "11:00"), (3, "18:00", "20:00")]
        .iter()
        .enumerate()
        .map(|(i, (day, start, end))| TimeSlot {
            id: format!("slot_{}", i + 1),
            day_of_week: *day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            available: true,
        })
        .collect()
}

fn range_bound(hours: &str, minutes: Option<regex::Match>) -> Option<u32> {
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.map_or(Some(0), |m| m.as_str().parse().ok())?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Extracts weekly slots from a free-text message such as
/// "Lundi 14h-16h, Mardi 9h30-11h". Each day name owns the time ranges that
/// follow it up to the next day name. Ranges that end before they start are dropped.
/// Slot ids are numbered across the whole message, so a repeated day name
/// never yields a duplicate id.
pub fn parse_schedule_from_message(message: &str) -> Vec<TimeSlot> {
    let lower = message.to_lowercase();
    let days: Vec<(usize, usize, u8)> = day_name_pattern()
        .captures_iter(&lower)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            let day = DAY_NAMES.iter().position(|d| *d == m.as_str())? as u8 + 1;
            Some((m.start(), m.end(), day))
        })
        .collect();

    let mut slots = Vec::new();
    for (i, (_, segment_start, day)) in days.iter().enumerate() {
        let segment_end = days.get(i + 1).map_or(lower.len(), |(start, _, _)| *start);
        let segment = &lower[*segment_start..segment_end];

        for caps in time_range_pattern().captures_iter(segment) {
            let start = range_bound(&caps[1], caps.get(2));
            let end = range_bound(&caps[3], caps.get(4));
            match start.zip(end) {
                Some((start, end)) if end > start => slots.push(TimeSlot {
                    id: format!("slot_{}_{}", day, slots.len()),
                    day_of_week: *day,
                    start_time: minutes_to_time_string(start),
                    end_time: minutes_to_time_string(end),
                    available: true,
                }),
                _ => log::debug!("Ignoring time range '{}'", &caps[0]),
            }
        }
    }

    if slots.is_empty() {
        return default_slots();
    }
    slots
}
