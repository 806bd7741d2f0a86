use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post};
use semgap_core::{Analyzer, AnalyzerConfig, FetchConfig, TaxonomyLoader};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api;
use crate::config::ServerConfig;

/// Shared handler state. The analyzer is immutable and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub fetch: FetchConfig,
}

impl AppState {
    pub fn new(analyzer: Analyzer, fetch: FetchConfig) -> Self {
        Self { analyzer: Arc::new(analyzer), fetch }
    }

    /// Load the taxonomy and build the analyzer once at startup
    pub fn from_config(config: &ServerConfig) -> semgap_core::Result<Self> {
        let mut loader = TaxonomyLoader::new();
        if let Some(path) = &config.taxonomy_path {
            loader = loader.path(path);
        }
        let taxonomy = loader.load()?;
        tracing::info!(topics = taxonomy.len(), "Taxonomy loaded");

        let fetch = FetchConfig { timeout: config.fetch_timeout, ..Default::default() };
        Ok(Self::new(Analyzer::with_taxonomy_and_config(taxonomy, AnalyzerConfig::default()), fetch))
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/api/crawl-url", post(api::crawl_url))
        .route("/api/test-gap-analysis", post(api::test_gap_analysis))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ))
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
