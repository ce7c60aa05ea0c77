use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 {
        parts.push(format!("{}m", mins));
    }
    if secs > 0 || (days == 0 && hours == 0 && mins == 0) {
        parts.push(format!("{}s", secs));
    }

    parts.join(" ")
}

/// Parses a wall-clock time such as `09:30`.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| anyhow!("Invalid time '{}', expected HH:MM", value))
}

/// Parses a run length such as `8h` or `1h 30m`.
pub fn parse_timeout(value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| anyhow!("Invalid timeout '{}': {}", value, e))
}

pub fn interval_from_minutes(minutes: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(minutes * 60.0)
        .map_err(|_| anyhow!("Interval of {} minutes is out of range", minutes))
}

/// Converts a seconds value from the config, naming the field on failure.
pub fn duration_from_secs(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| anyhow!("{} must be a non-negative number of seconds in range, got {}", name, value))
}
