//! # optic-server: HTTP JSON API
//!
//! Serves the catalog, the receipt store, the live calculator and the
//! receipt documents to the browser front end.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                      liveness + database ping           │
//! │                                                                         │
//! │  GET    /api/products                catalog, in display order          │
//! │  POST   /api/products                create (201)                       │
//! │  GET    /api/products/{id}                                              │
//! │  PUT    /api/products/{id}           rename / reprice                   │
//! │  DELETE /api/products/{id}           (204)                              │
//! │  POST   /api/products/{id}/move      {"direction": "up" | "down"}       │
//! │                                                                         │
//! │  GET    /api/receipts                newest first                       │
//! │  POST   /api/receipts                finalize + store (201)             │
//! │  POST   /api/receipts/quote          totals for the form, nothing saved │
//! │  POST   /api/receipts/generate-pdf   PDF of the form, nothing saved     │
//! │  GET    /api/receipts/{id}                                              │
//! │  DELETE /api/receipts/{id}           (204)                              │
//! │  GET    /api/receipts/{id}/pdf       PDF of a stored receipt            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use optic_db::Database;
use optic_print::RenderOptions;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Default `RUST_LOG` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,optic=debug";

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub render: Arc<RenderOptions>,
}

impl AppState {
    pub fn new(db: Database, render: RenderOptions) -> Self {
        AppState {
            db,
            render: Arc::new(render),
        }
    }
}

/// Builds the application router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::products::router())
        .merge(routes::receipts::router())
        .merge(routes::documents::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
