// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Sync
//!
//! Runs one synchronization pass: new activities are appended to the local
//! dataset and their GPS tracks saved as GPX files.

use anyhow::Context;
use strava_sync::{config::Config, services::SyncService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(data_dir = %config.data_dir.display(), "Starting Strava sync");

    let report = SyncService::new(&config).run().await?;

    if report.discovered == 0 {
        tracing::info!("No new activities");
    } else {
        tracing::info!(
            discovered = report.discovered,
            tracks_written = report.tracks_written,
            already_present = report.already_present,
            without_gps = report.without_gps,
            not_found = report.not_found,
            failed = ?report.failed,
            short_usage = ?report.rate_usage.map(|u| (u.short.used, u.short.limit)),
            daily_usage = ?report.rate_usage.map(|u| (u.daily.used, u.daily.limit)),
            "Finished, check the data folder for GPX and Parquet files"
        );
    }
    Ok(())
}

/// Initialize logging; `LOG_FORMAT=json` switches to structured JSON output.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strava_sync=debug,info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}
