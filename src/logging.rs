//! Log output setup
//!
//! The terminal belongs to the dashboard, so logs go to a file in the
//! configuration directory instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the configuration directory
pub const LOG_FILE_NAME: &str = "uptime-checker.log";

/// Filter used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "uptime_checker=info";

/// Opens (appending) the log file, creating the directory if needed
fn open_log_file(config_dir: &Path) -> Option<File> {
    fs::create_dir_all(config_dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(config_dir))
        .ok()
}

/// Path of the log file for a configuration directory
pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join(LOG_FILE_NAME)
}

/// Installs the global subscriber
///
/// Returns false when the log file could not be opened; logging is then
/// discarded.
pub fn init_logging(config_dir: &Path) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file = open_log_file(config_dir);
    let opened = file.is_some();

    let layer = fmt::layer().with_ansi(false).with_target(false);
    let result = match file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(Mutex::new(file)))
            .try_init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(std::io::sink))
            .try_init(),
    };

    opened && result.is_ok()
}
