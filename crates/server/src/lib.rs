//! # sheetfix-server
//!
//! Web front end for the sheetfix conversion pipeline: upload an Excel
//! workbook, get it back with numbers stored as text turned into numbers.

pub mod cleanup;
pub mod config;
pub mod routes;
pub mod security;
pub mod storage;
pub mod templates;
pub mod validate;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use config::ServerConfig;
use sheetfix_convert::ConvertOptions;
use std::sync::Arc;
use storage::TempStore;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TempStore>,
    pub max_content_length: usize,
    pub convert: Arc<ConvertOptions>,
}

impl AppState {
    pub fn new(store: TempStore, max_content_length: usize, convert: ConvertOptions) -> Self {
        AppState {
            store: Arc::new(store),
            max_content_length,
            convert: Arc::new(convert),
        }
    }

    pub fn from_config(store: TempStore, config: &ServerConfig) -> Self {
        let convert = ConvertOptions::default().with_summary_column(Some(config.summary_column));
        Self::new(store, config.max_content_length, convert)
    }
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(routes::index))
        .route("/upload", get(routes::upload_form).post(routes::upload))
        .route("/download/:filename", get(routes::download))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(state.max_content_length))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    security::with_security_headers(router)
}
