/// Online event API handlers
use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use super::AppState;
use crate::error::Result;
use crate::models::{EventsResponse, ItemId, PutResponse, UserId};

const DEFAULT_EVENTS_K: usize = 10;

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub user_id: UserId,
    pub item_id: ItemId,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub user_id: UserId,
    pub k: Option<usize>,
}

/// POST /put
/// Store one event for the user
#[post("/put")]
pub async fn put_event(
    query: web::Query<EventQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state
        .service
        .record_event(query.user_id, query.item_id)
        .await?;

    Ok(HttpResponse::Ok().json(PutResponse::ok()))
}

/// POST /get
/// Most recent events for the user, newest first
#[post("/get")]
pub async fn get_events(
    query: web::Query<RecentQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let k = state.resolve_k(query.k, DEFAULT_EVENTS_K)?;
    let events = state.service.recent_events(query.user_id, k).await?;

    debug!(user_id = query.user_id, k, count = events.len(), "Recent events");
    Ok(HttpResponse::Ok().json(EventsResponse { events }))
}
