//! Natural language due-date parsing module
//!
//! Supports various date formats, with an optional trailing time of day:
//! - ISO dates: "2026-01-25", "2026-01-25 18:30"
//! - Human dates: "Jan 25", "January 25 2026"
//! - Relative: "today", "tomorrow", "monday", "next friday"
//! - Offset: "in 3 days", "in 1 week"
//! - Time suffix: "tomorrow 14:00", "next friday at 09:30"

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};

use crate::error::{CoreError, Result};

/// Parse a due date/time string into a local `DateTime`
///
/// A trailing `HH:MM` (optionally preceded by "at") sets the time of day;
/// without one the task is due at midnight starting that day.
pub fn parse_due(input: &str) -> Result<DateTime<Local>> {
    let input = input.trim();

    // Full date-time forms first
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return to_local(dt);
        }
    }

    let (date_part, time) = split_time_suffix(input);
    let date = parse_date(date_part)?;
    let time = time.unwrap_or(NaiveTime::MIN);
    to_local(date.and_time(time))
}

fn to_local(dt: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&dt)
        .single()
        .ok_or_else(|| CoreError::parse("Ambiguous local date/time"))
}

/// Split a trailing "HH:MM" token (and an optional "at" before it) off the input
fn split_time_suffix(input: &str) -> (&str, Option<NaiveTime>) {
    let Some((head, last)) = input.rsplit_once(char::is_whitespace) else {
        return (input, None);
    };

    let Ok(time) = NaiveTime::parse_from_str(last, "%H:%M") else {
        return (input, None);
    };

    let head = head.trim_end();
    let head = head.strip_suffix(" at").unwrap_or(head);
    (head.trim_end(), Some(time))
}

/// Parse a date string into a NaiveDate
///
/// Supports multiple formats:
/// - ISO: "2026-01-25"
/// - Human: "Jan 25", "January 25", "Jan 25 2026"
/// - Relative: "today", "tomorrow"
/// - Weekdays: "monday", "tuesday", etc. (next occurrence)
/// - Prefixed: "next monday", "next friday"
/// - Offset: "in 3 days", "in 1 week", "in 2 weeks"
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();

    // Try relative dates first
    if let Some(date) = try_parse_relative(&input) {
        return Ok(date);
    }

    // Try weekday parsing
    if let Some(date) = try_parse_weekday(&input) {
        return Ok(date);
    }

    // Try offset parsing ("in X days/weeks")
    if let Some(date) = try_parse_offset(&input) {
        return Ok(date);
    }

    // Try ISO format
    if let Ok(date) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return Ok(date);
    }

    // Formats carrying an explicit year
    let with_year = [
        "%b %d %Y", // jan 25 2026
        "%B %d %Y", // january 25 2026
        "%m/%d/%Y", // 01/25/2026
        "%d %b %Y", // 25 jan 2026
        "%d %B %Y", // 25 january 2026
    ];
    for format in &with_year {
        if let Ok(date) = NaiveDate::parse_from_str(&input, format) {
            return Ok(date);
        }
    }

    // Year-less formats resolve to the next occurrence
    let without_year = [
        "%b %d", // jan 25
        "%B %d", // january 25
        "%m/%d", // 01/25
    ];
    for format in &without_year {
        let padded = format!("{} {}", input, Local::now().year());
        let padded_format = format!("{} %Y", format);
        if let Ok(mut date) = NaiveDate::parse_from_str(&padded, &padded_format) {
            if date < Local::now().date_naive() {
                date = date
                    .with_year(date.year() + 1)
                    .ok_or_else(|| CoreError::parse("Invalid date"))?;
            }
            return Ok(date);
        }
    }

    Err(CoreError::parse(format!(
        "Could not parse date '{}'. Try formats like: 'tomorrow', 'Jan 25', '2026-01-25 18:00', 'next monday', 'in 3 days'",
        input
    )))
}

fn try_parse_relative(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();

    match input {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => None,
    }
}

fn try_parse_weekday(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();
    let input = input.trim();

    // "next <weekday>" always skips to next week
    let weekday_str = input.strip_prefix("next ").unwrap_or(input);

    let target_weekday = match weekday_str {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    let days = (target_weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let days_until = if days == 0 { 7 } else { days as u64 };

    today.checked_add_days(Days::new(days_until))
}

fn try_parse_offset(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();

    // Match "in X day(s)" or "in X week(s)"
    let rest = input.strip_prefix("in ")?.trim();
    let parts: Vec<&str> = rest.split_whitespace().collect();

    if parts.len() != 2 {
        return None;
    }

    let num: u64 = parts[0].parse().ok()?;
    let unit = parts[1].to_lowercase();

    match unit.as_str() {
        "day" | "days" => today.checked_add_days(Days::new(num)),
        "week" | "weeks" => today.checked_add_days(Days::new(num * 7)),
        _ => None,
    }
}

/// Format a due date for human-readable display
///
/// Returns strings like: "Today 14:00", "Tomorrow", "Mon Jan 27 09:30",
/// "Overdue (3 days ago)"
pub fn format_due_human(due: DateTime<Local>, relative_to_today: bool) -> String {
    let time_str = if due.time() == NaiveTime::MIN {
        String::new()
    } else {
        due.format(" %H:%M").to_string()
    };

    if !relative_to_today {
        return format!("{}{}", due.format("%Y-%m-%d"), time_str);
    }

    let today = Local::now().date_naive();
    let diff = due.date_naive().signed_duration_since(today).num_days();

    match diff {
        0 => format!("Today{}", time_str),
        1 => format!("Tomorrow{}", time_str),
        -1 => format!("Yesterday{}", time_str),
        2..=6 => format!("{}{}", due.format("%a %b %d"), time_str),
        7..=365 => format!("{}{}", due.format("%b %d"), time_str),
        _ if diff < 0 => format!("Overdue ({} days ago)", -diff),
        _ => format!("{}{}", due.format("%Y-%m-%d"), time_str),
    }
}
