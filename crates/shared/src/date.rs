use time::format_description::well_known::Iso8601;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Weekday};

/// Returns the Monday of the calendar week containing `date`.
///
/// Any two dates inside the same calendar week map to the same value.
pub fn week_start(date: Date) -> Date {
    let days_since_monday = match date.weekday() {
        Weekday::Monday => 0,
        Weekday::Tuesday => 1,
        Weekday::Wednesday => 2,
        Weekday::Thursday => 3,
        Weekday::Friday => 4,
        Weekday::Saturday => 5,
        Weekday::Sunday => 6,
    };

    date - Duration::days(days_since_monday)
}

/// Returns the Sunday closing the week that starts at `week_start`.
pub fn week_end(week_start: Date) -> Date {
    week_start + Duration::days(6)
}

/// Returns the 0..=6 slot of `date` within its week.
///
/// `date` must fall within `[week_start, week_start + 6]`; anything outside
/// that range is a caller bug, not a recoverable condition.
pub fn day_index(date: Date, week_start: Date) -> usize {
    let days = (date - week_start).whole_days();
    assert!(
        (0..7).contains(&days),
        "{date} does not fall in the week starting {week_start}"
    );

    days as usize
}

/// Parses a week start as sent by the remote layer.
///
/// Accepts the plain `2025-08-18` form first, then a full ISO-8601
/// datetime, keeping only its calendar date.
pub fn parse_week_start(raw: &str) -> crate::Result<Date> {
    let plain = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(raw, &plain) {
        return Ok(date);
    }

    OffsetDateTime::parse(raw, &Iso8601::DEFAULT)
        .map(|moment| moment.date())
        .map_err(|_| crate::Error::Parse(raw.to_owned()))
}

/// Short human-readable label for a week, e.g. `Sep 1, 2025`.
pub fn week_label(week_start: Date) -> String {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    week_start.format(&format).unwrap_or_else(|_| week_start.to_string())
}
