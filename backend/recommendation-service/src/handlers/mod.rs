pub mod events;
pub mod health;
pub mod recommendations;
pub mod similar;

use crate::error::{AppError, Result};
use crate::services::RecommendationService;
use actix_web::web;
use std::sync::Arc;

// Re-export handlers for convenience
pub use events::{get_events, put_event, EventQuery, RecentQuery};
pub use health::{health_check, readiness_check, root};
pub use recommendations::{
    blended_recommendations, get_stats, recommendations_default, recommendations_offline,
    recommendations_online, DefaultQuery, UserRecsQuery,
};
pub use similar::{similar_items, SimilarQuery};

/// Shared state for every route
pub struct AppState {
    pub service: Arc<RecommendationService>,
    pub max_k: usize,
}

impl AppState {
    pub fn new(service: Arc<RecommendationService>, max_k: usize) -> Self {
        Self { service, max_k }
    }

    /// Resolve an optional `k` against its endpoint default and reject out-of-range values.
    pub fn resolve_k(&self, k: Option<usize>, default: usize) -> Result<usize> {
        let k = k.unwrap_or(default);
        if k == 0 {
            return Err(AppError::Validation("k must be positive".to_string()));
        }
        if k > self.max_k {
            return Err(AppError::Validation(format!(
                "k must not exceed {}",
                self.max_k
            )));
        }
        Ok(k)
    }
}

/// Register every route of the service
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root)
        .service(health_check)
        .service(readiness_check)
        .service(put_event)
        .service(get_events)
        .service(similar_items)
        .service(recommendations_default)
        .service(recommendations_offline)
        .service(recommendations_online)
        .service(blended_recommendations)
        .service(get_stats)
        .route("/metrics", web::get().to(crate::metrics::metrics_handler));
}
