// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Sync: keep a local copy of one athlete's Strava history
//!
//! This crate reconciles the Strava activity list with a local data tree:
//! a deduplicated activity dataset (Parquet plus a CSV mirror) and one GPX
//! track per activity with GPS data.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
