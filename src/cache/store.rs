//! On-disk storage for the cache record
//!
//! Provides a `CacheStore` that reads and writes a single JSON file. Reading
//! never fails: a missing or invalid file is treated as an empty record.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::data::Monitor;

/// File name of the cache inside the configuration directory
pub const CACHE_FILE_NAME: &str = "cache.json";

/// Persisted state shared across process invocations
///
/// Serialized as `{ "data": Monitor[] | null, "timestamps": number[] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheRecord {
    /// Last dataset fetched successfully
    pub data: Option<Vec<Monitor>>,
    /// Epoch milliseconds of API calls made within the trailing window
    #[serde(default)]
    pub timestamps: Vec<i64>,
}

/// Reads and writes the cache record as JSON
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Creates a store for `cache.json` inside `config_dir`
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(CACHE_FILE_NAME),
        }
    }

    /// Creates a store backed by an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record from disk
    ///
    /// Returns an empty record (no data, no timestamps) when the file is
    /// missing, unreadable or does not match the expected shape.
    pub async fn load(&self) -> CacheRecord {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no cache file, starting empty");
                return CacheRecord::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring invalid cache file");
                CacheRecord::default()
            }
        }
    }

    /// Writes the record to disk, creating the containing directory if needed
    pub async fn save(&self, record: &CacheRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(&self.path, json).await
    }
}
