use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};

/// Longest span a permission request may cover, in whole minutes.
pub const PERMISSION_MAX_MINUTES: i64 = 60;

pub fn parse_hhmm(time_str: &str) -> Result<NaiveTime> {
    let time_str = time_str.trim();

    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| anyhow!("Invalid time format. Use HH:MM (24-hour)"))
}

/// Whole-minute difference `to - from` on a 24-hour clock. Both times are
/// assumed to fall on the same day; no cross-midnight wraparound, so a
/// `to` earlier than `from` comes back negative. This is the single
/// minute-math shared by the submission validator and display rendering.
pub fn minutes_between(from: &str, to: &str) -> Result<i64> {
    let from = parse_hhmm(from)?;
    let to = parse_hhmm(to)?;

    Ok((to - from).num_minutes())
}

/// Render a permission span: "Xh Ym" from one hour up, plain "Ym" below.
pub fn format_minutes(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Inclusive day count of a leave span. A collapsed or absent end date is a
/// single day.
pub fn leave_days(from_date: NaiveDate, to_date: Option<NaiveDate>) -> i64 {
    match to_date {
        Some(to) => (to - from_date).num_days().abs() + 1,
        None => 1,
    }
}

pub fn format_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Human-facing duration label for a persisted request, pure in its inputs.
/// Permission with unparseable/missing times degrades to "N/A" rather than
/// failing the listing.
pub fn describe(
    is_permission: bool,
    from_date: NaiveDate,
    to_date: Option<NaiveDate>,
    from_time: Option<&str>,
    to_time: Option<&str>,
) -> String {
    if is_permission {
        match (from_time, to_time) {
            (Some(from), Some(to)) => match minutes_between(from, to) {
                Ok(minutes) => format_minutes(minutes),
                Err(_) => "N/A".to_string(),
            },
            _ => "N/A".to_string(),
        }
    } else {
        format_days(leave_days(from_date, to_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn minutes_between_same_day_times() {
        assert_eq!(minutes_between("09:00", "10:00").unwrap(), 60);
        assert_eq!(minutes_between("09:00", "09:45").unwrap(), 45);
        assert_eq!(minutes_between("13:30", "13:31").unwrap(), 1);
    }

    #[test]
    fn minutes_between_is_negative_when_reversed() {
        assert_eq!(minutes_between("10:00", "09:00").unwrap(), -60);
        assert_eq!(minutes_between("09:00", "09:00").unwrap(), 0);
    }

    #[test]
    fn bad_time_strings_are_errors() {
        assert!(minutes_between("9am", "10:00").is_err());
        assert!(minutes_between("09:00", "25:00").is_err());
        assert!(minutes_between("", "10:00").is_err());
    }

    #[test]
    fn minute_formatting_switches_at_one_hour() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn leave_day_count_is_inclusive() {
        let from = date(2024, 6, 10);
        assert_eq!(leave_days(from, None), 1);
        assert_eq!(leave_days(from, Some(from)), 1);
        assert_eq!(leave_days(from, Some(date(2024, 6, 12))), 3);
    }

    #[test]
    fn describe_renders_both_request_kinds() {
        let from = date(2024, 6, 10);
        assert_eq!(
            describe(true, from, Some(from), Some("09:00"), Some("09:30")),
            "30m"
        );
        assert_eq!(describe(true, from, Some(from), None, Some("09:30")), "N/A");
        assert_eq!(describe(false, from, Some(from), None, None), "1 day");
        assert_eq!(
            describe(false, from, Some(date(2024, 6, 14)), None, None),
            "5 days"
        );
    }
}
