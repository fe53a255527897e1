// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth credential persisted between runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bearer credential, mirroring Strava's token refresh response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as a Unix timestamp (seconds)
    pub expires_at: i64,
    /// Other response fields (`token_type`, `expires_in`, ...), kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Whether the access token expires at or before `now + lookahead`.
    pub fn expires_within(&self, now: DateTime<Utc>, lookahead: Duration) -> bool {
        self.expires_at <= (now + lookahead).timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(expires_at: i64) -> Credential {
        Credential {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_expiry_window_is_inclusive() {
        let now = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let lookahead = Duration::seconds(300);

        assert!(credential(1_000_300).expires_within(now, lookahead));
        assert!(credential(999_000).expires_within(now, lookahead));
        assert!(!credential(1_000_301).expires_within(now, lookahead));
    }

    #[test]
    fn test_unknown_fields_survive() {
        let json = r#"{"token_type":"Bearer","access_token":"a","expires_at":5,"expires_in":21600,"refresh_token":"r"}"#;
        let cred: Credential = serde_json::from_str(json).unwrap();
        assert_eq!(cred.extra["token_type"], "Bearer");

        let back: Value = serde_json::to_value(&cred).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }
}
