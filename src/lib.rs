//! Uptime Checker Library
//!
//! This module exposes the data-refresh core (credentials, cache, API client
//! and refresh orchestration) for the binary and for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod data;
pub mod logging;
pub mod refresh;
