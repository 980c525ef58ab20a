//! Access token resolution and persistence
//!
//! The token comes from, in order: the `--token` flag, the token file in the
//! configuration directory, then the `UPTIMEROBOT_TOKEN` environment variable.
//! A flag value that differs from the stored one replaces it on disk.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

/// File name of the stored token inside the configuration directory
pub const TOKEN_FILE_NAME: &str = "uptime_robot_token";

/// Environment variable consulted when no other source has a token
pub const TOKEN_ENV_VAR: &str = "UPTIMEROBOT_TOKEN";

/// Errors from token resolution
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No source produced a token
    #[error(
        "Please provide a readonly UptimeRobot access token using the --token flag or the UPTIMEROBOT_TOKEN environment variable."
    )]
    Missing,

    /// Writing the token file failed
    #[error("Failed to save token: {0}")]
    Persist(#[from] io::Error),
}

/// Resolves the access token from its sources
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    env_token: Option<String>,
}

impl TokenStore {
    /// Creates a store for the token file inside `config_dir`
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding the token file
    /// * `env_token` - Value of the environment fallback, read once at startup
    pub fn new(config_dir: &Path, env_token: Option<String>) -> Self {
        Self {
            path: config_dir.join(TOKEN_FILE_NAME),
            env_token: non_empty(env_token),
        }
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token, trimmed of surrounding whitespace
    pub async fn read(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).await.ok()?;
        non_empty(Some(content))
    }

    /// Writes `token` to the token file, creating the directory if needed
    pub async fn save(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, token).await?;
        Ok(())
    }

    /// Determines the token to use
    ///
    /// An explicit token always wins and is persisted when it differs from the
    /// stored value. A failed write is logged and does not affect the result.
    ///
    /// # Returns
    /// * `Ok(String)` - The resolved token
    /// * `Err(CredentialError::Missing)` - If no source has a token
    pub async fn resolve(&self, explicit: Option<&str>) -> Result<String, CredentialError> {
        let stored = self.read().await;

        if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
            if stored.as_deref() != Some(token) {
                match self.save(token).await {
                    Ok(()) => info!(path = %self.path.display(), "saved new access token"),
                    Err(e) => warn!(error = %e, "could not persist access token"),
                }
            }
            return Ok(token.to_string());
        }

        if let Some(token) = stored {
            debug!("using stored access token");
            return Ok(token);
        }

        if let Some(token) = &self.env_token {
            debug!("using access token from {}", TOKEN_ENV_VAR);
            return Ok(token.clone());
        }

        Err(CredentialError::Missing)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
