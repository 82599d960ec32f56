//! HTTP clients for remote events / similarity services.
//!
//! Both speak the same query-parameter surface this service exposes
//! (`/put`, `/get`, `/similar_items`).

use crate::error::{AppError, Result};
use crate::models::{EventsResponse, ItemId, SimilarItem, SimilarItemsResponse, UserId};
use crate::services::{EventHistory, SimilarityLookup};
use async_trait::async_trait;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

#[derive(Serialize)]
struct PutParams {
    user_id: UserId,
    item_id: ItemId,
}

#[derive(Serialize)]
struct GetParams {
    user_id: UserId,
    k: usize,
}

#[derive(Serialize)]
struct SimilarParams {
    item_id: ItemId,
    k: usize,
}

/// Remote `EventHistory`
pub struct EventsClient {
    http: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl EventHistory for EventsClient {
    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()> {
        self.http
            .post(endpoint(&self.base_url, "put"))
            .query(&PutParams { user_id, item_id })
            .send()
            .await?
            .error_for_status()?;

        debug!(user_id, item_id, "Event forwarded to events service");
        Ok(())
    }

    async fn fetch_recent(&self, user_id: UserId, k: usize) -> Result<Vec<ItemId>> {
        let response: EventsResponse = self
            .http
            .post(endpoint(&self.base_url, "get"))
            .query(&GetParams { user_id, k })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut events = response.events;
        events.truncate(k);
        Ok(events)
    }
}

/// Remote `SimilarityLookup`
///
/// Responses are re-sorted and deduplicated locally so the port contract
/// holds even when the remote service returns neighbours in table order.
pub struct SimilarityClient {
    http: reqwest::Client,
    base_url: String,
}

impl SimilarityClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SimilarityLookup for SimilarityClient {
    async fn fetch_similar(&self, item_id: ItemId, k: usize) -> Result<Vec<SimilarItem>> {
        let response: SimilarItemsResponse = self
            .http
            .post(endpoint(&self.base_url, "similar_items"))
            .query(&SimilarParams { item_id, k })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut items = response.into_items();
        items.retain(|item| !item.score.is_nan());
        items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let mut seen = HashSet::with_capacity(items.len());
        items.retain(|item| seen.insert(item.item_id));
        items.truncate(k);

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("http://127.0.0.1:8020/", "get"),
            "http://127.0.0.1:8020/get"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:8010", "similar_items"),
            "http://127.0.0.1:8010/similar_items"
        );
    }
}
