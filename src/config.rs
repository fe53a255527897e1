// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync configuration loaded from environment variables.
//!
//! The configuration is built once at startup and passed by reference into
//! every component.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://www.strava.com/api/v3";
const DEFAULT_OAUTH_URL: &str = "https://www.strava.com/oauth/token";

/// Sync configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (used only for token refresh)
    pub strava_client_id: String,
    /// Strava OAuth client secret (used only for token refresh)
    pub strava_client_secret: String,
    /// Base URL of the Strava REST API
    pub api_base_url: String,
    /// Strava OAuth token endpoint
    pub oauth_token_url: String,
    /// Root of the local data tree
    pub data_dir: PathBuf,
    /// Fixed delay between per-activity stream requests
    pub request_delay: Duration,
    /// Wait imposed when the short-window quota is nearly exhausted
    pub rate_limit_cooldown: Duration,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            oauth_token_url: DEFAULT_OAUTH_URL.to_string(),
            data_dir: PathBuf::from("data"),
            request_delay: Duration::from_millis(500),
            rate_limit_cooldown: Duration::from_secs(30),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            api_base_url: env::var("STRAVA_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            oauth_token_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            request_delay: Duration::from_millis(parse_env("SYNC_REQUEST_DELAY_MS", 500)?),
            rate_limit_cooldown: Duration::from_secs(parse_env("SYNC_COOLDOWN_SECS", 30)?),
            http_timeout: Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 10)?),
        })
    }

    /// Test configuration rooted at `data_dir`, talking to a local server.
    pub fn for_local(data_dir: impl Into<PathBuf>, server_uri: &str) -> Self {
        Self {
            api_base_url: server_uri.to_string(),
            oauth_token_url: format!("{}/oauth/token", server_uri),
            data_dir: data_dir.into(),
            request_delay: Duration::from_millis(1),
            rate_limit_cooldown: Duration::from_millis(5),
            ..Self::default()
        }
    }

    /// Directory holding one GPX file per activity.
    pub fn gpx_dir(&self) -> PathBuf {
        self.raw_dir().join("gpx")
    }

    /// Primary (Parquet) activity dataset.
    pub fn dataset_path(&self) -> PathBuf {
        self.raw_dir().join("activities.parquet")
    }

    /// Plain-text mirror of the activity dataset.
    pub fn dataset_csv_path(&self) -> PathBuf {
        self.dataset_path().with_extension("csv")
    }

    /// Persisted OAuth credential.
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("cache").join("token.json")
    }

    fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    /// Create the data directory tree.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        let token_path = self.token_path();
        let cache_dir = token_path.parent().unwrap_or(Path::new("."));
        for dir in [self.gpx_dir().as_path(), cache_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

fn parse_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, value)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
