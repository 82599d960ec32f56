use actix_web::{web, App, HttpServer};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recommendation_service::clients::{EventsClient, SimilarityClient};
use recommendation_service::snapshot;
use recommendation_service::{
    configure_routes, AppError, AppState, Config, EventHistory, OfflineCatalog, RecentEventStore,
    RecommendationService, SimilarityIndex, SimilarityLookup,
};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},actix_web=info,recommendation_service=debug", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting recommendation-service v{}",
        env!("CARGO_PKG_VERSION")
    );

    config
        .validate()
        .context("Configuration validation failed")?;
    info!("Configuration loaded and validated");

    let timeout = config.dependency_timeout();

    // Offline recommendations are always in-process
    let catalog = Arc::new(OfflineCatalog::new());
    snapshot::load_offline_catalog(
        &catalog,
        Path::new(&config.personal_snapshot_path),
        Path::new(&config.default_snapshot_path),
    )
    .context("Failed to load offline recommendations")?;

    let history: Arc<dyn EventHistory> = match &config.events_service_url {
        Some(url) => {
            info!(url = %url, "Using remote events service");
            Arc::new(EventsClient::new(url.clone(), timeout)?)
        }
        None => {
            info!(
                capacity = config.history_capacity,
                "Using in-process event store"
            );
            Arc::new(RecentEventStore::new(config.history_capacity))
        }
    };

    let similarity: Arc<dyn SimilarityLookup> = match &config.features_service_url {
        Some(url) => {
            info!(url = %url, "Using remote similarity service");
            Arc::new(SimilarityClient::new(url.clone(), timeout)?)
        }
        None => {
            let index = SimilarityIndex::new();
            snapshot::load_similarity_index(&index, Path::new(&config.similar_snapshot_path))
                .context("Failed to load similarity index")?;
            Arc::new(index)
        }
    };

    let service = Arc::new(RecommendationService::new(
        catalog, history, similarity, timeout,
    ));

    // Refuse to serve before every load has completed
    if !service.is_ready() {
        return Err(anyhow!("Catalogs not loaded, refusing to accept requests"));
    }
    info!("Ready!");

    let state = web::Data::new(AppState::new(Arc::clone(&service), config.max_k));

    info!(
        "Starting HTTP server on {}:{}",
        config.http_host, config.http_port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(state.clone())
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                warn!(error = %err, "Rejected query parameters");
                AppError::Validation(err.to_string()).into()
            }))
            .configure(configure_routes)
    })
    .bind((config.http_host.as_str(), config.http_port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    service.log_stats();
    info!("Stopping");

    Ok(())
}
