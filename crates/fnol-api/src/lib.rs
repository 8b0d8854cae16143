//! HTTP API for FNOL claim intake.
//!
//! Exposes document text extraction, claim analysis and claim storage over
//! JSON endpoints built on Axum.
//!
//! # Example
//!
//! ```rust,ignore
//! use fnol_api::{create_router, AppState};
//!
//! let state = AppState::from_config(&config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use fnol_core::{open_store, ClaimAnalyzer, ClaimStore, DocumentExtractor, FnolConfig};

use crate::handlers::{claims, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ClaimAnalyzer>,
    pub documents: Arc<DocumentExtractor>,
    pub store: Arc<dyn ClaimStore>,
    /// Maximum request body size for uploads.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        analyzer: ClaimAnalyzer,
        documents: DocumentExtractor,
        store: Arc<dyn ClaimStore>,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            documents: Arc::new(documents),
            store,
            max_upload_bytes: fnol_core::models::config::ServerConfig::default().max_upload_bytes,
        }
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Build the analyzer, document extractor and store from configuration.
    pub fn from_config(config: &FnolConfig) -> fnol_core::Result<Self> {
        let analyzer = ClaimAnalyzer::from_config(config)?;
        let documents = DocumentExtractor::new(&config.extraction.sample_document);
        let store: Arc<dyn ClaimStore> = Arc::from(open_store(&config.storage)?);

        Ok(Self::new(analyzer, documents, store)
            .with_max_upload_bytes(config.server.max_upload_bytes))
    }
}

/// Creates the API router
pub fn create_router(state: AppState) -> Router {
    let claims_routes = Router::new()
        .route("/extract-text", post(claims::extract_text))
        .route("/analyze", post(claims::analyze))
        .route("/save", post(claims::save_claim))
        .route("/", get(claims::list_claims))
        .route("/:id", get(claims::get_claim));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/claims", claims_routes)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
