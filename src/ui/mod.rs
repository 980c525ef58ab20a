//! UI rendering module for the uptime dashboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod format;
pub mod help_overlay;
pub mod monitor_list;
pub mod widgets;

pub use help_overlay::render as render_help_overlay;
pub use monitor_list::render as render_monitor_list;

#[cfg(test)]
pub(crate) mod test_support {
    use uptime_checker::data::{LogEntry, LogType, Monitor, MonitorStatus, MonitorType, ResponseTime};

    /// Builds a monitor with a recovery, an outage and a few samples
    pub fn sample_monitor(id: u64, name: &str) -> Monitor {
        Monitor {
            id,
            status: MonitorStatus::Up,
            friendly_name: format!("{} {}", name, id),
            url: format!("https://www.{}{}.example.com/", name, id),
            average_response_time: Some(144.123),
            custom_uptime_ratio: Some("99.989".to_string()),
            monitor_type: MonitorType::Http,
            interval: 300,
            logs: vec![
                LogEntry {
                    log_type: LogType::Up,
                    datetime: 1_727_200_000,
                    duration: 0,
                },
                LogEntry {
                    log_type: LogType::Down,
                    datetime: 1_727_199_885,
                    duration: 115,
                },
            ],
            response_times: vec![
                ResponseTime {
                    datetime: 1_727_200_600,
                    value: 150.0,
                },
                ResponseTime {
                    datetime: 1_727_200_300,
                    value: 90.0,
                },
            ],
        }
    }
}
