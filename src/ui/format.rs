//! Text formatting for monitor fields

use chrono::{Local, TimeZone};
use ratatui::style::Color;

use uptime_checker::data::MonitorStatus;

const SECONDS_IN_MINUTE: u64 = 60;
const SECONDS_IN_HOUR: u64 = 60 * SECONDS_IN_MINUTE;
const SECONDS_IN_DAY: u64 = 24 * SECONDS_IN_HOUR;
const SECONDS_IN_MONTH: u64 = 30 * SECONDS_IN_DAY;
const SECONDS_IN_YEAR: u64 = 365 * SECONDS_IN_DAY;

/// Label and color for a monitor status
pub fn status_presenter(status: MonitorStatus) -> (&'static str, Color) {
    match status {
        MonitorStatus::Paused => ("Paused", Color::DarkGray),
        MonitorStatus::Pending => ("Pending", Color::Gray),
        MonitorStatus::Up => ("Up", Color::Green),
        MonitorStatus::SeemsDown => ("Seems down", Color::Yellow),
        MonitorStatus::Down => ("Down", Color::Red),
        MonitorStatus::Unknown(_) => ("Error", Color::Red),
    }
}

/// Formats a duration in seconds as a compact string such as "17d" or "1m 55s"
///
/// Smaller units are dropped as larger ones appear: hours are hidden once
/// months show, minutes once days show, seconds once hours show.
pub fn format_duration(duration: u64) -> String {
    let years = duration / SECONDS_IN_YEAR;
    let months = (duration % SECONDS_IN_YEAR) / SECONDS_IN_MONTH;
    let days = (duration % SECONDS_IN_YEAR % SECONDS_IN_MONTH) / SECONDS_IN_DAY;
    let hours = (duration % SECONDS_IN_DAY) / SECONDS_IN_HOUR;
    let minutes = (duration % SECONDS_IN_HOUR) / SECONDS_IN_MINUTE;
    let seconds = duration % SECONDS_IN_MINUTE;

    let mut parts = Vec::new();
    if years > 0 {
        parts.push(format!("{}y", years));
    }
    if months > 0 {
        parts.push(format!("{}mo", months));
    }
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if months == 0 && hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if days == 0 && months == 0 && minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if hours == 0 && days == 0 && months == 0 && (seconds > 0 || duration == 0) {
        parts.push(format!("{}s", seconds));
    }

    parts.join(" ")
}

/// Formats an epoch-seconds timestamp as a local `YYYY-MM-DD` date
pub fn format_date(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Strips the scheme, a leading `www.` and one trailing slash from a URL
pub fn short_url(url: &str) -> &str {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .map(|rest| rest.strip_prefix("www.").unwrap_or(rest))
        .unwrap_or(url);

    without_scheme.strip_suffix('/').unwrap_or(without_scheme)
}

/// Uptime ratio with a percent sign, collapsing "100.000" to "100%"
pub fn uptime_ratio_label(ratio: Option<&str>) -> Option<String> {
    let ratio = ratio.map(str::trim).filter(|r| !r.is_empty())?;
    if ratio == "100.000" {
        return Some("100%".to_string());
    }
    Some(format!("{}%", ratio))
}

/// Average response time in whole milliseconds
pub fn response_time_label(millis: Option<f64>) -> Option<String> {
    let millis = millis?;
    Some(format!("{}ms", millis.trunc() as u64))
}
