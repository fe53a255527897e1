// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde_json::{json, Value};
use std::path::Path;
use strava_sync::config::Config;
use strava_sync::models::Credential;
use strava_sync::services::CredentialStore;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointing at a mock server, with data under `dir`.
#[allow(dead_code)]
pub fn test_config(dir: &Path, server: &MockServer) -> Config {
    Config::for_local(dir, &server.uri())
}

/// A list-endpoint activity object.
#[allow(dead_code)]
pub fn activity_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "start_date": "2026-02-04T12:00:00Z",
        "type": "Run",
        "sport_type": "Run",
        "distance": 8046.7,
        "moving_time": 2400,
        "elapsed_time": 2460,
        "total_elevation_gain": 42.0,
        "average_heartrate": 151.3,
        "start_latlng": [37.33, -122.05],
        "end_latlng": [37.34, -122.06],
        "kudos_count": 3
    })
}

/// Streams response with `n` GPS samples, one every five seconds.
#[allow(dead_code)]
pub fn streams_json(n: usize) -> Value {
    let latlng: Vec<[f64; 2]> = (0..n)
        .map(|i| [37.33 + i as f64 * 0.0001, -122.05])
        .collect();
    let altitude: Vec<f64> = (0..n).map(|i| 20.0 + i as f64).collect();
    let time: Vec<i64> = (0..n as i64).map(|i| i * 5).collect();
    let heartrate: Vec<u32> = (0..n).map(|_| 140).collect();
    json!({
        "latlng": { "data": latlng, "series_type": "distance" },
        "altitude": { "data": altitude },
        "time": { "data": time },
        "heartrate": { "data": heartrate }
    })
}

/// Persist a credential expiring at `expires_at` (Unix seconds).
#[allow(dead_code)]
pub fn write_credential(config: &Config, access_token: &str, expires_at: i64) {
    let mut extra = serde_json::Map::new();
    extra.insert("token_type".to_string(), json!("Bearer"));
    CredentialStore::new(config.token_path())
        .save(&Credential {
            access_token: access_token.to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at,
            extra,
        })
        .expect("Failed to write credential");
}

/// Credential valid for another hour.
#[allow(dead_code)]
pub fn write_valid_credential(config: &Config) {
    write_credential(config, "access-token", chrono::Utc::now().timestamp() + 3600);
}

/// Serve `body` for one activity list page.
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve streams for one activity, expecting exactly `times` requests.
#[allow(dead_code)]
pub async fn mount_streams(server: &MockServer, activity_id: u64, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/activities/{}/streams", activity_id)))
        .and(query_param("key_by_type", "true"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}
