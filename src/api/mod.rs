use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::clients::{DataSource, DatasetError, source_for};
use crate::config::Config;

mod assets;
mod error;
mod observability;
mod search;
mod types;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn DataSource>,
    pub prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl AppState {
    /// Builds the dataset source named in the config.
    ///
    /// # Errors
    ///
    /// Fails when the configured HTTP client settings are invalid.
    pub fn new(
        config: Config,
        prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
    ) -> Result<Self, DatasetError> {
        let source = source_for(&config.dataset.source, &config.dataset)?;
        Ok(Self::with_source(config, source, prometheus_handle))
    }

    /// Uses `source` instead of the one named in the config.
    #[must_use]
    pub fn with_source(
        config: Config,
        source: Arc<dyn DataSource>,
        prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
    ) -> Self {
        Self {
            config,
            source,
            prometheus_handle,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/search", get(search::search_entries))
        .route("/entries", get(search::list_entries));

    Router::new()
        .route("/search", post(search::submit_search))
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .nest("/api", api_router)
        .fallback(assets::serve_asset)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

/// Serves the search page until Ctrl+C.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.server.bind_address, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        dataset = %state.source.describe(),
        mode = %state.config.search.mode,
        "🌐 Search page running at http://{}",
        addr
    );

    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Error listening for shutdown: {}", e),
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
