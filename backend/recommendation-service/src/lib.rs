pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod snapshot;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::{configure_routes, AppState};
pub use services::{
    EventHistory, OfflineCatalog, RecentEventStore, RecommendationService, SimilarityIndex,
    SimilarityLookup,
};
