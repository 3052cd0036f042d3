//! Time utilities: RFC 3339 timestamp parse/format with a defensive
//! fallback, and duration decomposition into days/hours/minutes/seconds.

use chrono::{DateTime, Duration, Local};

/// Placeholder some older stores wrote instead of a real timestamp.
pub const MISSING_TIMESTAMP: &str = "N/A";

/// Serialize a timestamp to the text form every store column uses.
/// RFC 3339 round-trips exactly through [`try_parse_timestamp`].
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.to_rfc3339()
}

/// Strict parse; `None` on empty input, the `"N/A"` sentinel, or bad text.
pub fn try_parse_timestamp(text: &str) -> Option<DateTime<Local>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == MISSING_TIMESTAMP {
        return None;
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}

/// Defensive parse: never fails, substitutes `fallback` for anything
/// unreadable. The store's history includes rows written under looser
/// validation, so every decode path goes through here.
pub fn parse_timestamp(text: &str, fallback: DateTime<Local>) -> DateTime<Local> {
    try_parse_timestamp(text).unwrap_or(fallback)
}

/// Format a duration as `[-][Nd ]HH:MM:SS`.
/// The sign prefix appears only when `show_sign` is set and the duration is
/// negative; the day component is omitted when zero.
pub fn format_duration(d: Duration, show_sign: bool) -> String {
    let sign = if show_sign && d < Duration::zero() {
        "-"
    } else {
        ""
    };
    let total = d.num_seconds().abs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}{}d {:02}:{:02}:{:02}", sign, days, hours, minutes, seconds)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_round_trips_exactly() {
        let now = Local::now();
        let text = format_timestamp(&now);
        assert_eq!(try_parse_timestamp(&text), Some(now));
    }

    #[test]
    fn parse_falls_back_on_garbage() {
        let fallback = Local.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("", fallback), fallback);
        assert_eq!(parse_timestamp("  ", fallback), fallback);
        assert_eq!(parse_timestamp("N/A", fallback), fallback);
        assert_eq!(parse_timestamp("not-a-date", fallback), fallback);
        assert_eq!(parse_timestamp("2025-13-45T99:99", fallback), fallback);
    }

    #[test]
    fn parse_accepts_valid_rfc3339() {
        let fallback = Local::now();
        let ts = Local.with_ymd_and_hms(2025, 9, 1, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp(&ts.to_rfc3339(), fallback), ts);
    }

    #[test]
    fn duration_formats_without_day_component() {
        let d = Duration::hours(2) + Duration::minutes(5) + Duration::seconds(9);
        assert_eq!(format_duration(d, false), "02:05:09");
        assert_eq!(format_duration(d, true), "02:05:09");
    }

    #[test]
    fn duration_formats_with_day_component() {
        let d = Duration::days(3) + Duration::hours(4) + Duration::seconds(7);
        assert_eq!(format_duration(d, false), "3d 04:00:07");
    }

    #[test]
    fn negative_duration_signed_only_on_request() {
        let d = Duration::minutes(-90);
        assert_eq!(format_duration(d, true), "-01:30:00");
        assert_eq!(format_duration(d, false), "01:30:00");
    }

    #[test]
    fn ten_year_duration_does_not_overflow() {
        let d = Duration::days(3_653) + Duration::seconds(59);
        assert_eq!(format_duration(d, false), "3653d 00:00:59");
    }

    // Decomposition must reconstruct the original duration exactly.
    #[test]
    fn decomposition_round_trips() {
        for secs in [0i64, 1, 59, 60, 3_599, 3_600, 86_399, 86_400, 315_360_000] {
            let d = Duration::seconds(secs);
            let text = format_duration(d, false);
            let (days, rest) = match text.split_once("d ") {
                Some((days, rest)) => (days.parse::<i64>().unwrap(), rest),
                None => (0, text.as_str()),
            };
            let parts: Vec<i64> = rest.split(':').map(|p| p.parse().unwrap()).collect();
            let rebuilt = days * 86_400 + parts[0] * 3_600 + parts[1] * 60 + parts[2];
            assert_eq!(rebuilt, secs);
        }
    }
}
