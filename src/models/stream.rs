// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity stream channels (`key_by_type=true` response).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named time-series channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel<T> {
    pub data: Vec<T>,
}

impl<T> Channel<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Per-activity bundle of channels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamSet {
    /// `[lat, lng]` pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latlng: Option<Channel<[f64; 2]>>,
    /// Elevation in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<Channel<f64>>,
    /// Seconds since activity start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Channel<i64>>,
    /// Channels not used for track construction (heartrate, moving, ...)
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl StreamSet {
    /// Position samples, or `None` when the channel is missing or empty.
    pub fn positions(&self) -> Option<&[[f64; 2]]> {
        self.latlng
            .as_ref()
            .map(|c| c.data.as_slice())
            .filter(|data| !data.is_empty())
    }
}
