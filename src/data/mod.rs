//! Core data models for the uptime dashboard
//!
//! This module contains the monitor snapshot types returned by the UptimeRobot
//! API and stored in the local cache, plus the client that fetches them.

pub mod client;

pub use client::{FetchError, MonitorSource, UptimeRobotClient};

use serde::{Deserialize, Deserializer, Serialize};

/// One monitored endpoint as reported by the API
///
/// Snapshots are never mutated locally; each refresh replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    /// Unique monitor identifier
    pub id: u64,
    /// Current status of the monitor
    pub status: MonitorStatus,
    /// Human-readable name
    pub friendly_name: String,
    /// Monitored URL or host
    pub url: String,
    /// Average response time in milliseconds, if the API reported one
    #[serde(default, deserialize_with = "lenient_millis")]
    pub average_response_time: Option<f64>,
    /// Uptime percentage over the requested rolling window (e.g. "99.989")
    #[serde(default)]
    pub custom_uptime_ratio: Option<String>,
    /// Kind of check performed
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    /// Polling interval in seconds
    pub interval: u64,
    /// Recent status-change events, newest first as sent by the API
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    /// Recent response-time samples
    #[serde(default)]
    pub response_times: Vec<ResponseTime>,
}

/// One historical status-change event for a monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Kind of event
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// When the event happened (epoch seconds)
    pub datetime: i64,
    /// How long the resulting state lasted (seconds)
    #[serde(default)]
    pub duration: u64,
}

/// A single response-time sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTime {
    /// Sample time (epoch seconds)
    pub datetime: i64,
    /// Response time in milliseconds
    pub value: f64,
}

/// Monitor status codes used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MonitorStatus {
    Paused,
    Pending,
    Up,
    SeemsDown,
    Down,
    /// A code this client does not know about
    Unknown(u8),
}

impl From<u8> for MonitorStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => MonitorStatus::Paused,
            1 => MonitorStatus::Pending,
            2 => MonitorStatus::Up,
            8 => MonitorStatus::SeemsDown,
            9 => MonitorStatus::Down,
            other => MonitorStatus::Unknown(other),
        }
    }
}

impl From<MonitorStatus> for u8 {
    fn from(status: MonitorStatus) -> Self {
        match status {
            MonitorStatus::Paused => 0,
            MonitorStatus::Pending => 1,
            MonitorStatus::Up => 2,
            MonitorStatus::SeemsDown => 8,
            MonitorStatus::Down => 9,
            MonitorStatus::Unknown(code) => code,
        }
    }
}

/// Monitor type codes used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MonitorType {
    Http,
    Keyword,
    Ping,
    Port,
    Heartbeat,
    Unknown(u8),
}

impl MonitorType {
    /// Display label for the monitor type
    pub fn label(&self) -> &'static str {
        match self {
            MonitorType::Http => "HTTP",
            MonitorType::Keyword => "Keyword",
            MonitorType::Ping => "Ping",
            MonitorType::Port => "Port",
            MonitorType::Heartbeat => "Heartbeat",
            MonitorType::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for MonitorType {
    fn from(code: u8) -> Self {
        match code {
            1 => MonitorType::Http,
            2 => MonitorType::Keyword,
            3 => MonitorType::Ping,
            4 => MonitorType::Port,
            5 => MonitorType::Heartbeat,
            other => MonitorType::Unknown(other),
        }
    }
}

impl From<MonitorType> for u8 {
    fn from(kind: MonitorType) -> Self {
        match kind {
            MonitorType::Http => 1,
            MonitorType::Keyword => 2,
            MonitorType::Ping => 3,
            MonitorType::Port => 4,
            MonitorType::Heartbeat => 5,
            MonitorType::Unknown(code) => code,
        }
    }
}

/// Log entry type codes used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum LogType {
    /// The monitor went down (outage start)
    Down,
    /// The monitor came back up (recovery)
    Up,
    Started,
    Paused,
    Unknown(u8),
}

impl From<u8> for LogType {
    fn from(code: u8) -> Self {
        match code {
            1 => LogType::Down,
            2 => LogType::Up,
            98 => LogType::Started,
            99 => LogType::Paused,
            other => LogType::Unknown(other),
        }
    }
}

impl From<LogType> for u8 {
    fn from(kind: LogType) -> Self {
        match kind {
            LogType::Down => 1,
            LogType::Up => 2,
            LogType::Started => 98,
            LogType::Paused => 99,
            LogType::Unknown(code) => code,
        }
    }
}

impl Monitor {
    /// Returns the latest outage event, if any
    pub fn most_recent_outage(&self) -> Option<&LogEntry> {
        self.most_recent(LogType::Down)
    }

    /// Returns the latest recovery event, if any
    pub fn most_recent_recovery(&self) -> Option<&LogEntry> {
        self.most_recent(LogType::Up)
    }

    /// Latest log entry of the given kind by timestamp.
    ///
    /// Ties keep the entry that appears last in `logs`.
    fn most_recent(&self, kind: LogType) -> Option<&LogEntry> {
        self.logs
            .iter()
            .filter(|entry| entry.log_type == kind)
            .max_by_key(|entry| entry.datetime)
    }

    /// Seconds since the most recent recovery, only while the monitor is up
    ///
    /// # Arguments
    /// * `now_secs` - Current time in epoch seconds
    pub fn up_for(&self, now_secs: i64) -> Option<u64> {
        if self.status != MonitorStatus::Up {
            return None;
        }
        let recovery = self.most_recent_recovery()?;
        let elapsed = now_secs - recovery.datetime;
        (elapsed > 0).then_some(elapsed as u64)
    }
}

/// Accepts a number, a numeric string, an empty string or null
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}
