//! HTTP layer - JSON API over the catalog core.
//!
//! Handlers translate requests into core calls and core errors into status codes;
//! no business rule lives here. The database connection is injected through
//! [`AppState`] rather than held globally.

/// Error to response mapping
pub mod error;
/// Extractors with JSON rejections
pub mod extract;
/// Route handlers
pub mod handlers;


use crate::errors::Result;
use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared state available to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for all catalog operations
    pub db: DatabaseConnection,
}

impl AppState {
    /// Creates the shared state around an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Builds the API router.
///
/// CORS is fully open because the dashboard is served from a different origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
        .route(
            "/products/:product_id/workshops",
            get(handlers::workshops_for_product),
        )
        .route(
            "/products/:product_id/total-time",
            get(handlers::product_total_time),
        )
        .route("/workshops", get(handlers::list_workshops))
        .route("/product-types", get(handlers::list_product_types))
        .route("/material-types", get(handlers::list_material_types))
        .route("/materials/calc", post(handlers::materials_calc))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on `addr` until Ctrl-C is received.
///
/// # Errors
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
