// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delta discovery: walk the activity list until we reach known data.

use crate::error::Result;
use crate::models::ActivitySummary;
use crate::services::rate_limit::RequestPacer;
use crate::services::strava::StravaClient;
use std::collections::HashSet;

/// Activities requested per page.
pub const PAGE_SIZE: u32 = 50;

/// Collect the activities that are not yet in `known_ids`.
///
/// Pages are requested newest first. Every item of a page is scanned even
/// after a known id shows up, since ordering within a page is not trusted.
/// Pagination stops after the first page containing a known id, or at an
/// empty page. With no known ids the whole history is walked.
///
/// Any request failure aborts discovery.
pub async fn discover_new_activities(
    client: &StravaClient,
    access_token: &str,
    known_ids: &HashSet<u64>,
    pacer: &mut RequestPacer,
) -> Result<Vec<ActivitySummary>> {
    let mut new_activities = Vec::new();
    let mut page = 1;

    loop {
        pacer.wait_turn().await;
        tracing::info!(page, "Fetching Strava activities page");

        let response = client
            .list_activities(access_token, page, PAGE_SIZE)
            .await?;
        pacer.observe(response.usage);

        let activities = response.data;
        if activities.is_empty() {
            break;
        }

        let (boundary_hit, fresh) = split_page(activities, known_ids);
        tracing::debug!(page, new = fresh.len(), boundary_hit, "Scanned page");
        new_activities.extend(fresh);

        if boundary_hit {
            break;
        }
        page += 1;
    }

    if new_activities.is_empty() {
        tracing::info!("Everything is already up to date");
    } else {
        tracing::info!(count = new_activities.len(), "Found new activities");
    }

    Ok(new_activities)
}

/// Separate one page into unknown activities, noting whether a known id was seen.
fn split_page(
    page: Vec<ActivitySummary>,
    known_ids: &HashSet<u64>,
) -> (bool, Vec<ActivitySummary>) {
    let mut boundary_hit = false;
    let mut fresh = Vec::with_capacity(page.len());

    for activity in page {
        if known_ids.contains(&activity.id) {
            boundary_hit = true;
            continue;
        }
        fresh.push(activity);
    }

    (boundary_hit, fresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: u64) -> ActivitySummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Run {}", id),
            "start_date": "2026-01-01T07:00:00Z"
        }))
        .unwrap()
    }

    fn ids(activities: &[ActivitySummary]) -> Vec<u64> {
        activities.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_split_page_keeps_scanning_after_boundary() {
        let known: HashSet<u64> = [101].into();
        let page = vec![activity(205), activity(101), activity(204), activity(203)];

        let (hit, fresh) = split_page(page, &known);
        assert!(hit);
        assert_eq!(ids(&fresh), vec![205, 204, 203]);
    }

    #[test]
    fn test_split_page_without_known_ids() {
        let (hit, fresh) = split_page(vec![activity(3), activity(2)], &HashSet::new());
        assert!(!hit);
        assert_eq!(ids(&fresh), vec![3, 2]);
    }

    #[test]
    fn test_split_page_all_known() {
        let known: HashSet<u64> = [1, 2].into();
        let (hit, fresh) = split_page(vec![activity(2), activity(1)], &known);
        assert!(hit);
        assert!(fresh.is_empty());
    }
}
