use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Hour from which a slot falling on the current day is pushed to next week
pub const EVENING_CUTOFF_HOUR: u32 = 18;

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hours: u32 = parts[0].parse().ok()?;
    let minutes: u32 = parts[1].parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}

/// Length of a slot in minutes, or `None` if either bound is malformed
pub fn slot_duration_minutes(start_time: &str, end_time: &str) -> Option<i64> {
    let start = parse_time_to_minutes(start_time)?;
    let end = parse_time_to_minutes(end_time)?;
    Some(end as i64 - start as i64)
}

/// Converts a slot weekday (1 = Monday .. 7 = Sunday) to the
/// platform convention (0 = Sunday .. 6 = Saturday)
pub fn slot_day_to_platform(day_of_week: u8) -> Option<u32> {
    match day_of_week {
        1 => Some(1), // Monday
        2 => Some(2),
        3 => Some(3),
        4 => Some(4),
        5 => Some(5),
        6 => Some(6), // Saturday
        7 => Some(0), // Sunday
        _ => None,
    }
}

/// Projects a weekly slot day onto the nearest upcoming calendar date.
/// A slot falling on today is moved to next week once the evening cutoff has passed.
pub fn next_date_for_weekday(day_of_week: u8, now: NaiveDateTime) -> Option<NaiveDate> {
    let target = slot_day_to_platform(day_of_week)?;
    let today = now.weekday().num_days_from_sunday();
    let mut days_until_target = (target + 7 - today) % 7;

    if days_until_target == 0 && now.hour() >= EVENING_CUTOFF_HOUR {
        days_until_target = 7;
    }

    Some(now.date() + Duration::days(days_until_target as i64))
}

/// Whole days from `now` until the start of `exam_date`, rounded up
pub fn days_until(exam_date: NaiveDate, now: NaiveDateTime) -> Option<i64> {
    let exam_start = exam_date.and_hms_opt(0, 0, 0)?;
    let seconds = (exam_start - now).num_seconds() as f64;
    Some((seconds / 86_400.0).ceil() as i64)
}

/// Parses an ISO calendar date ("YYYY-MM-DD")
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// French weekday name, capitalized, for a calendar date
pub fn french_weekday_name(date: NaiveDate) -> &'static str {
    const NAMES: [&str; 7] = [
        "Dimanche", "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi",
    ];
    NAMES[date.weekday().num_days_from_sunday() as usize]
}
