// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the sync engine.
//!
//! Handles:
//! - Paged activity listing
//! - Per-activity stream retrieval
//! - Token refresh
//! - Rate limit header extraction on every data response

use crate::config::Config;
use crate::error::SyncError;
use crate::models::{ActivitySummary, Credential, StreamSet};
use crate::services::rate_limit::{parse_rate_limits, RateUsage};
use serde::Deserialize;

/// Channels requested for every activity.
pub const STREAM_KEYS: &str = "time,latlng,altitude,heartrate,velocity_smooth,grade_smooth,moving";

/// A decoded response body together with the quota usage it reported.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub usage: Option<RateUsage>,
}

/// Result of a stream request.
#[derive(Debug, Clone)]
pub enum StreamOutcome {
    Found(StreamSet),
    /// Strava answered 404; the activity has no stream data.
    NotFound,
}

/// Strava API client.
///
/// Owns the HTTP session for a run; dropping the client closes it.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a client (and its connection pool) from configuration.
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| SyncError::StravaApi(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            oauth_url: config.oauth_token_url.clone(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
        })
    }

    /// List the athlete's activities, newest first.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ApiResponse<Vec<ActivitySummary>>, SyncError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| SyncError::StravaApi(e.to_string()))?;

        let usage = parse_rate_limits(response.headers());
        let data = check_response_json(response)
            .await
            .map_err(SyncError::StravaApi)?;
        Ok(ApiResponse { data, usage })
    }

    /// Fetch the stream channels of one activity.
    ///
    /// A 404 is reported as [`StreamOutcome::NotFound`]. Every other failure
    /// becomes [`SyncError::ActivityFetch`] so the caller can skip just this
    /// activity. Quota usage is returned even when the request failed, as
    /// long as a response arrived.
    pub async fn get_streams(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> ApiResponse<Result<StreamOutcome, SyncError>> {
        let url = format!("{}/activities/{}/streams", self.base_url, activity_id);
        let fetch_error = |message: String| SyncError::ActivityFetch {
            activity_id,
            message,
        };

        let response = match self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("keys", STREAM_KEYS), ("key_by_type", "true")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ApiResponse {
                    data: Err(fetch_error(e.to_string())),
                    usage: None,
                }
            }
        };

        let usage = parse_rate_limits(response.headers());

        let data = if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(StreamOutcome::NotFound)
        } else {
            check_response_json(response)
                .await
                .map(StreamOutcome::Found)
                .map_err(fetch_error)
        };
        ApiResponse { data, usage }
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Credential, SyncError> {
        let response = self
            .http
            .post(&self.oauth_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| SyncError::CredentialRefresh(format!("Token refresh request failed: {}", e)))?;

        check_response_json(response)
            .await
            .map_err(SyncError::CredentialRefresh)
    }
}

/// Check response status and parse the JSON body.
///
/// Errors are returned as messages so each caller can wrap them in the
/// variant matching its failure scope.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(SyncError::STRAVA_RATE_LIMIT.to_string());
        }

        if status.as_u16() == 401 {
            return Err(SyncError::STRAVA_TOKEN_ERROR.to_string());
        }

        return Err(format!("HTTP {}: {}", status, body));
    }

    response
        .json()
        .await
        .map_err(|e| format!("JSON parse error: {}", e))
}
