// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential lifecycle: load, validate, refresh, persist.
//!
//! The credential file is owned by a single process. There is no locking.

use crate::error::{Result, SyncError};
use crate::models::Credential;
use crate::services::strava::StravaClient;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::PathBuf;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// File-backed store for the bearer credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted credential, or `None` if no file exists.
    pub fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Persist a credential, replacing the previous one.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(credential)?)?;
        Ok(())
    }

    /// Get a non-expiring access token, refreshing it if needed.
    pub async fn get_valid_token(&self, client: &StravaClient) -> Result<String> {
        self.get_valid_token_at(client, Utc::now()).await
    }

    /// Same as [`get_valid_token`](Self::get_valid_token) with an explicit clock.
    ///
    /// A token expiring within five minutes of `now` is refreshed exactly
    /// once; the refreshed credential is written to disk before its access
    /// token is returned. Refresh failures are not retried.
    pub async fn get_valid_token_at(
        &self,
        client: &StravaClient,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let credential = self
            .load()?
            .ok_or_else(|| SyncError::CredentialMissing(self.path.clone()))?;

        if !credential.expires_within(now, Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)) {
            return Ok(credential.access_token);
        }

        tracing::info!(
            expires_at = credential.expires_at,
            "Access token expired or expiring soon, refreshing"
        );

        let refreshed = client.refresh_token(&credential.refresh_token).await?;
        self.save(&refreshed)?;

        tracing::info!(expires_at = refreshed.expires_at, "Token refreshed and saved");
        Ok(refreshed.access_token)
    }
}
