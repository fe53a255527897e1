// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rate-gated stream retrieval for one activity.

use crate::error::Result;
use crate::services::rate_limit::RequestPacer;
use crate::services::strava::{StravaClient, StreamOutcome};

/// Fetch the channels of `activity_id`, honoring the pacer.
///
/// The fixed per-activity delay window restarts after every attempt, and
/// quota usage is fed to the pacer before any failure is propagated.
pub async fn fetch_streams(
    client: &StravaClient,
    access_token: &str,
    activity_id: u64,
    pacer: &mut RequestPacer,
) -> Result<StreamOutcome> {
    pacer.wait_turn().await;

    let response = client.get_streams(access_token, activity_id).await;
    pacer.record_attempt();
    pacer.observe(response.usage);

    let outcome = response.data?;
    if matches!(outcome, StreamOutcome::NotFound) {
        tracing::debug!(activity_id, "No streams for activity (404)");
    }
    Ok(outcome)
}
