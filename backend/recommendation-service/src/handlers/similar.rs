use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use super::AppState;
use crate::error::Result;
use crate::models::{ItemId, SimilarItemsResponse};

const DEFAULT_SIMILAR_K: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub item_id: ItemId,
    pub k: Option<usize>,
}

/// POST /similar_items
/// Up to `k` items similar to `item_id`, as parallel `item_id_2` / `score` columns
#[post("/similar_items")]
pub async fn similar_items(
    query: web::Query<SimilarQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let k = state.resolve_k(query.k, DEFAULT_SIMILAR_K)?;
    let items = state.service.similar_items(query.item_id, k).await?;

    Ok(HttpResponse::Ok().json(SimilarItemsResponse::from(items)))
}
