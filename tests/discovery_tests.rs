// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delta discovery against a mock activity list.

mod common;

use common::{activity_json, mount_page};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use strava_sync::error::SyncError;
use strava_sync::services::{discover_new_activities, RequestPacer, StravaClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_pacer() -> RequestPacer {
    RequestPacer::new(Duration::from_millis(1), Duration::from_millis(5))
}

fn ids(activities: &[strava_sync::models::ActivitySummary]) -> Vec<u64> {
    activities.iter().map(|a| a.id).collect()
}

#[tokio::test]
async fn test_full_history_walks_until_empty_page() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &server);

    mount_page(&server, 1, json!([activity_json(30, "c"), activity_json(20, "b")])).await;
    mount_page(&server, 2, json!([activity_json(10, "a")])).await;
    mount_page(&server, 3, json!([])).await;

    let client = StravaClient::new(&config).unwrap();
    let mut pacer = test_pacer();
    let found = discover_new_activities(&client, "token", &HashSet::new(), &mut pacer)
        .await
        .unwrap();

    assert_eq!(ids(&found), vec![30, 20, 10]);
}

#[tokio::test]
async fn test_empty_first_page_yields_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &server);

    mount_page(&server, 1, json!([])).await;

    let client = StravaClient::new(&config).unwrap();
    let mut pacer = test_pacer();
    let known: HashSet<u64> = [1, 2, 3].into_iter().collect();
    let found = discover_new_activities(&client, "token", &known, &mut pacer)
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn test_known_id_stops_pagination_but_page_is_fully_scanned() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &server);

    mount_page(
        &server,
        1,
        json!([
            activity_json(205, "newest"),
            activity_json(204, "newer"),
            activity_json(101, "known"),
            activity_json(203, "out of order"),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([activity_json(100, "old")])))
        .expect(0)
        .mount(&server)
        .await;

    let client = StravaClient::new(&config).unwrap();
    let mut pacer = test_pacer();
    let known: HashSet<u64> = [100, 101].into_iter().collect();
    let found = discover_new_activities(&client, "token", &known, &mut pacer)
        .await
        .unwrap();

    assert_eq!(ids(&found), vec![205, 204, 203]);
}

#[tokio::test]
async fn test_boundary_on_second_page() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &server);

    mount_page(&server, 1, json!([activity_json(9, "i"), activity_json(8, "h")])).await;
    mount_page(&server, 2, json!([activity_json(7, "g"), activity_json(6, "f")])).await;

    let client = StravaClient::new(&config).unwrap();
    let mut pacer = test_pacer();
    let known: HashSet<u64> = [6].into_iter().collect();
    let found = discover_new_activities(&client, "token", &known, &mut pacer)
        .await
        .unwrap();

    assert_eq!(ids(&found), vec![9, 8, 7]);
}

#[tokio::test]
async fn test_list_failure_aborts_discovery() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &server);

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Authorization Error"
        })))
        .mount(&server)
        .await;

    let client = StravaClient::new(&config).unwrap();
    let mut pacer = test_pacer();
    let err = discover_new_activities(&client, "bad-token", &HashSet::new(), &mut pacer)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::StravaApi(ref msg) if msg == SyncError::STRAVA_TOKEN_ERROR));
}

#[tokio::test]
async fn test_list_usage_near_limit_arms_cooldown() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &server);

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("X-RateLimit-Usage", "140,900")
                .insert_header("X-RateLimit-Limit", "150,1000"),
        )
        .mount(&server)
        .await;

    let client = StravaClient::new(&config).unwrap();
    let mut pacer = RequestPacer::new(Duration::from_millis(1), Duration::from_secs(30));
    discover_new_activities(&client, "token", &HashSet::new(), &mut pacer)
        .await
        .unwrap();

    assert!(pacer.cooling_down());
    let usage = pacer.last_usage().unwrap();
    assert_eq!(usage.short.used, 140);
    assert_eq!(usage.daily.limit, 1000);
}
