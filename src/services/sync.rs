// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync orchestration.
//!
//! Handles the core workflow:
//! 1. Open the HTTP session and obtain a valid access token
//! 2. Discover activities newer than the local dataset
//! 3. For each one, fetch streams and write its GPX track
//! 4. Close the session and merge all new summaries into the dataset

use crate::config::Config;
use crate::db::DatasetStore;
use crate::error::Result;
use crate::models::ActivitySummary;
use crate::services::credentials::CredentialStore;
use crate::services::discovery::discover_new_activities;
use crate::services::rate_limit::{RateUsage, RequestPacer};
use crate::services::streams::fetch_streams;
use crate::services::strava::{StravaClient, StreamOutcome};
use crate::services::track::{build_track, track_exists, write_track};
use std::path::PathBuf;

/// What happened to one activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityOutcome {
    /// A new track file was written.
    TrackWritten(PathBuf),
    /// The track file already existed; nothing was fetched.
    AlreadyPresent,
    /// Streams had no position data.
    NoGps,
    /// Strava has no streams for the activity (404).
    NotFound,
}

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// New activities found by discovery
    pub discovered: usize,
    pub tracks_written: usize,
    pub already_present: usize,
    pub without_gps: usize,
    pub not_found: usize,
    /// Activities skipped because of a per-activity error
    pub failed: Vec<u64>,
    /// Rows in the dataset after the merge; `None` when nothing was merged
    pub dataset_rows: Option<usize>,
    /// Last quota usage Strava reported during the run
    pub rate_usage: Option<RateUsage>,
}

impl SyncReport {
    fn record(&mut self, outcome: &ActivityOutcome) {
        match outcome {
            ActivityOutcome::TrackWritten(_) => self.tracks_written += 1,
            ActivityOutcome::AlreadyPresent => self.already_present += 1,
            ActivityOutcome::NoGps => self.without_gps += 1,
            ActivityOutcome::NotFound => self.not_found += 1,
        }
    }
}

/// Synchronizes the remote activity history into local storage.
pub struct SyncService {
    config: Config,
    credentials: CredentialStore,
    dataset: DatasetStore,
    gpx_dir: PathBuf,
}

impl SyncService {
    pub fn new(config: &Config) -> Self {
        Self {
            credentials: CredentialStore::new(config.token_path()),
            dataset: DatasetStore::new(config.dataset_path(), config.dataset_csv_path()),
            gpx_dir: config.gpx_dir(),
            config: config.clone(),
        }
    }

    pub fn dataset(&self) -> &DatasetStore {
        &self.dataset
    }

    /// Run one synchronization pass.
    ///
    /// Per-activity failures are logged and counted; anything else aborts
    /// the run before the dataset is touched.
    pub async fn run(&self) -> Result<SyncReport> {
        self.config.ensure_dirs()?;
        let mut report = SyncReport::default();

        // The client (and its connections) lives only for this block.
        let new_activities = {
            let client = StravaClient::new(&self.config)?;
            let token = self.credentials.get_valid_token(&client).await?;
            let known_ids = self.dataset.known_ids()?;
            tracing::debug!(known = known_ids.len(), "Loaded known activity ids");
            let mut pacer = RequestPacer::from_config(&self.config);

            let new_activities =
                discover_new_activities(&client, &token, &known_ids, &mut pacer).await?;
            report.discovered = new_activities.len();

            let total = new_activities.len();
            for (index, activity) in new_activities.iter().enumerate() {
                tracing::info!(
                    index = index + 1,
                    total,
                    activity_id = activity.id,
                    name = %activity.name,
                    "Syncing activity"
                );

                match self
                    .sync_activity(&client, &token, activity, &mut pacer)
                    .await
                {
                    Ok(outcome) => report.record(&outcome),
                    Err(e) if e.is_per_activity() => {
                        tracing::error!(
                            activity_id = activity.id,
                            error = %e,
                            "Skipping activity"
                        );
                        report.failed.push(activity.id);
                    }
                    Err(e) => return Err(e),
                }
            }

            report.rate_usage = pacer.last_usage();
            new_activities
        };

        if new_activities.is_empty() {
            return Ok(report);
        }

        let rows = self.dataset.merge_and_persist(&new_activities)?;
        report.dataset_rows = Some(rows);

        tracing::info!(
            discovered = report.discovered,
            tracks_written = report.tracks_written,
            failed = report.failed.len(),
            rows,
            "Sync complete"
        );
        Ok(report)
    }

    async fn sync_activity(
        &self,
        client: &StravaClient,
        token: &str,
        activity: &ActivitySummary,
        pacer: &mut RequestPacer,
    ) -> Result<ActivityOutcome> {
        if track_exists(&self.gpx_dir, activity.id) {
            tracing::debug!(activity_id = activity.id, "Track already on disk");
            return Ok(ActivityOutcome::AlreadyPresent);
        }

        let streams = match fetch_streams(client, token, activity.id, pacer).await? {
            StreamOutcome::Found(streams) => streams,
            StreamOutcome::NotFound => return Ok(ActivityOutcome::NotFound),
        };

        match build_track(activity, &streams)? {
            Some(track) => Ok(ActivityOutcome::TrackWritten(write_track(
                &self.gpx_dir,
                &track,
            )?)),
            None => Ok(ActivityOutcome::NoGps),
        }
    }
}
