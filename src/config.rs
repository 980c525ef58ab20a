//! Runtime configuration for the refresh pipeline
//!
//! Everything the refresh cycle needs is carried in an explicit `Config` value
//! instead of module-level state.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::data::client::DEFAULT_API_URL;

/// Application name used for the per-user configuration directory
pub const APP_NAME: &str = "uptime-checker";

/// Maximum number of API calls allowed inside the trailing window
pub const DEFAULT_MAX_REQUESTS: usize = 10;

/// Length of the trailing window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Upper bound on a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the refresh pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the cache, token and log files
    pub config_dir: PathBuf,
    /// Trailing window used for request accounting
    pub window: Duration,
    /// Calls allowed inside `window`
    pub max_requests: usize,
    /// Endpoint for the monitors listing
    pub api_url: String,
    /// Timeout imposed around the fetch step
    pub fetch_timeout: Duration,
    /// Re-run the cycle on this period; `None` runs once plus manual refreshes
    pub refresh_interval: Option<Duration>,
}

impl Config {
    /// Creates a configuration rooted at `config_dir` with default limits
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
            api_url: DEFAULT_API_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            refresh_interval: None,
        }
    }

    /// Window length in milliseconds, as compared against cache timestamps
    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Returns the XDG-compliant configuration directory
///
/// Uses `~/.config/uptime-checker/` on Linux, or the platform equivalent.
/// Returns `None` if no home directory can be determined.
pub fn default_config_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", APP_NAME)?;
    Some(project_dirs.config_dir().to_path_buf())
}
