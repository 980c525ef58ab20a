//! UptimeRobot API client
//!
//! Performs the single `getMonitors` call per refresh cycle and maps every
//! failure to a `FetchError`. No retries are performed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::Monitor;

/// Default endpoint for the monitors listing
pub const DEFAULT_API_URL: &str = "https://api.uptimerobot.com/v2/getMonitors";

/// Number of log entries requested per monitor
const LOGS_LIMIT: u32 = 10;

/// Number of response-time samples requested per monitor
const RESPONSE_TIMES_LIMIT: u32 = 10;

/// Rolling window for the custom uptime ratio, in days
const UPTIME_RATIO_DAYS: u32 = 30;

/// Errors that can occur when fetching monitors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network unreachable, DNS failure, connection reset and similar
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request did not finish within the allotted time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    /// Success status but the body reported an API-level failure
    #[error("API error: {0}")]
    Api(String),

    /// Success status but the body could not be parsed
    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// True for failures that never reached the API (network or timeout)
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Timeout(_))
    }
}

/// Anything that can produce the current monitor list for a token
#[async_trait]
pub trait MonitorSource: Send + Sync {
    /// Fetches all monitors visible to `token`
    async fn fetch_monitors(&self, token: &str) -> Result<Vec<Monitor>, FetchError>;
}

/// `getMonitors` response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse {
    stat: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
    #[serde(default)]
    monitors: Option<Vec<Monitor>>,
}

/// Error object returned with `"stat": "fail"`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

/// Client for the UptimeRobot v2 API
#[derive(Debug, Clone)]
pub struct UptimeRobotClient {
    http_client: Client,
    base_url: String,
}

impl Default for UptimeRobotClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeRobotClient {
    /// Creates a client pointed at the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Creates a client pointed at a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Form parameters sent with every request
    fn form_params(token: &str) -> [(&'static str, String); 6] {
        [
            ("api_key", token.to_string()),
            ("logs", "1".to_string()),
            ("logs_limit", LOGS_LIMIT.to_string()),
            ("response_times", "1".to_string()),
            ("response_times_limit", RESPONSE_TIMES_LIMIT.to_string()),
            ("custom_uptime_ratios", UPTIME_RATIO_DAYS.to_string()),
        ]
    }

    /// Parses a success-status body into the monitor list
    fn parse_body(body: &str) -> Result<Vec<Monitor>, FetchError> {
        let response: ApiResponse = serde_json::from_str(body)?;

        if response.stat.as_deref() == Some("fail") {
            let message = response
                .error
                .and_then(|e| e.message.or(e.kind))
                .unwrap_or_else(|| "request failed".to_string());
            return Err(FetchError::Api(message));
        }

        response
            .monitors
            .ok_or_else(|| FetchError::Api("response did not include monitors".to_string()))
    }
}

#[async_trait]
impl MonitorSource for UptimeRobotClient {
    async fn fetch_monitors(&self, token: &str) -> Result<Vec<Monitor>, FetchError> {
        let response = self
            .http_client
            .post(&self.base_url)
            .form(&Self::form_params(token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Self::parse_body(&body)
    }
}
