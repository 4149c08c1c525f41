//! Display formatting for durations, counts and timestamps.

use chrono::{DateTime, Local, TimeZone};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// `H:MM:SS`, or `M:SS` when there are no whole hours.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Groups digits in threes with commas.
pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Relative phrase for recent timestamps, local date otherwise.
pub fn format_timestamp(timestamp_ms: i64, now: DateTime<Local>) -> String {
    let diff = now.timestamp_millis().saturating_sub(timestamp_ms).max(0);

    if diff < HOUR_MS {
        return format!("{} min ago", diff / MINUTE_MS);
    }
    if diff < DAY_MS {
        let hours = diff / HOUR_MS;
        return format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" });
    }

    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(date) => date.format("%x").to_string(),
        None => String::from("Unknown date"),
    }
}
