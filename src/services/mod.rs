// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - sync engine components.

pub mod credentials;
pub mod discovery;
pub mod rate_limit;
pub mod strava;
pub mod streams;
pub mod sync;
pub mod track;

pub use credentials::CredentialStore;
pub use discovery::discover_new_activities;
pub use rate_limit::{parse_rate_limits, QuotaWindow, RateUsage, RequestPacer};
pub use strava::{ApiResponse, StravaClient, StreamOutcome};
pub use streams::fetch_streams;
pub use sync::{ActivityOutcome, SyncReport, SyncService};
pub use track::{build_track, track_exists, track_path, write_track};
