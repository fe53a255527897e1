// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the sync engine.

pub mod activity;
pub mod credential;
pub mod stream;
pub mod track;

pub use activity::ActivitySummary;
pub use credential::Credential;
pub use stream::{Channel, StreamSet};
pub use track::{Track, TrackPoint};
