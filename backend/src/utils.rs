use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO8601_DURATION: Regex =
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid duration pattern");
}

/// Parse ISO8601 date string (as sent in `publishedAt`) to a UTC timestamp
pub fn parse_iso8601_to_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    date_str.parse::<DateTime<Utc>>().ok()
}

/// Parse ISO8601 duration string (PT1H2M3S) to total seconds.
/// Any of the three components may be missing; anything else yields 0.
pub fn parse_iso8601_duration_to_seconds(duration_str: &str) -> u64 {
    let Some(captures) = ISO8601_DURATION.captures(duration_str.trim()) else {
        return 0;
    };

    let component = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(1) * 3600 + component(2) * 60 + component(3)
}

/// Format seconds the way the site displays durations: `H:MM:SS`, `M:SS` or `0:SS`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
