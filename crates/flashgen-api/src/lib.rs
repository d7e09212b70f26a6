//! Flashgen API /v1: REST endpoints
//!
//! ```text
//! GET  /v1/health
//! GET  /v1/catalog
//! GET  /v1/socs/featured
//! GET  /v1/socs/full-list
//! GET  /v1/vendors/{vendor}/socs
//! GET  /v1/socs/{id}                                      pre-filled form
//! POST /v1/socs/{id}                                      resolve
//! GET  /v1/vendors/{vendor}/socs/{id}/download_full_image
//! GET  /metrics
//! ```
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use state::AppState;

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/catalog", get(handlers::catalog))
        .route("/v1/socs/featured", get(handlers::featured))
        .route("/v1/socs/full-list", get(handlers::full_list))
        .route("/v1/socs/{id}", get(handlers::prefill).post(handlers::resolve))
        .route("/v1/vendors/{vendor}/socs", get(handlers::vendor_socs))
        .route(
            "/v1/vendors/{vendor}/socs/{id}/download_full_image",
            get(handlers::download_full_image),
        )
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;

    tracing::info!(
        addr = %config.addr,
        store = %config.store_dir.display(),
        output = %config.output_dir.display(),
        "Flashgen API listening"
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
