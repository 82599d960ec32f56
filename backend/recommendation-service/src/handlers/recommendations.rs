/// Recommendation API Handlers
///
/// Default, offline, online and blended recommendation endpoints
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use super::AppState;
use crate::error::Result;
use crate::metrics;
use crate::models::{RecsResponse, UserId};

const DEFAULT_OFFLINE_K: usize = 100;
const DEFAULT_ONLINE_K: usize = 50;
const DEFAULT_BLENDED_K: usize = 100;

#[derive(Debug, Deserialize)]
pub struct DefaultQuery {
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UserRecsQuery {
    pub user_id: UserId,
    pub k: Option<usize>,
}

/// POST /recommendations_default
/// Top items for callers without user context
#[post("/recommendations_default")]
pub async fn recommendations_default(
    query: web::Query<DefaultQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    metrics::record_request("default");
    let k = state.resolve_k(query.k, DEFAULT_OFFLINE_K)?;
    let recs = state.service.default_recs(k)?;

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// POST /recommendations_offline
/// Personal offline list, or the default list for users without one
#[post("/recommendations_offline")]
pub async fn recommendations_offline(
    query: web::Query<UserRecsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    metrics::record_request("offline");
    let k = state.resolve_k(query.k, DEFAULT_OFFLINE_K)?;
    let recs = state.service.offline_recs(query.user_id, k)?;

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// POST /recommendations_online
/// Items similar to the user's 3 most recent events
#[post("/recommendations_online")]
pub async fn recommendations_online(
    query: web::Query<UserRecsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    metrics::record_request("online");
    let k = state.resolve_k(query.k, DEFAULT_ONLINE_K)?;
    let recs = state.service.online_recs(query.user_id, k).await;

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// POST /recommendations
/// Offline items on even positions, online items on odd positions
#[post("/recommendations")]
pub async fn blended_recommendations(
    query: web::Query<UserRecsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    metrics::record_request("blended");
    let k = state.resolve_k(query.k, DEFAULT_BLENDED_K)?;

    debug!(user_id = query.user_id, k, "Getting blended recommendations");
    let recs = state.service.blended_recs(query.user_id, k).await?;

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// GET /stats
#[get("/stats")]
pub async fn get_stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.service.stats())
}
