// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local storage layer (activity dataset).

pub mod dataset;

pub use dataset::{merge_activities, DatasetStore};
