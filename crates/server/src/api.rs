//! HTTP handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use semgap_core::{AnalysisOptions, Gap, Report, fetch_url, parse_http_url};
use tracing::Instrument;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

pub const SERVICE_NAME: &str = "Semgap Content Analysis API";
pub const API_VERSION: &str = "1.0";

/// Sample page used by the gap analysis smoke test
pub const SAMPLE_TEXT: &str = "
    Bitcoin is a cryptocurrency. It uses blockchain technology. Ethereum is another popular coin.
    This article explains crypto basics. No conclusion here.
    ";

pub const SAMPLE_KEYWORDS: [&str; 4] = ["bitcoin", "blockchain", "ethereum", "cryptocurrency"];

/// Body of `POST /api/crawl-url`. Omitted toggles keep the analyzer defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlRequest {
    pub url: String,
    pub max_content_length: Option<usize>,
    pub extract_entities: Option<bool>,
    pub extract_tags: Option<bool>,
    pub extract_keywords: Option<bool>,
    pub perform_gap_analysis: Option<bool>,
}

impl CrawlRequest {
    pub fn options(&self, defaults: &AnalysisOptions) -> AnalysisOptions {
        AnalysisOptions {
            perform_gap_analysis: self.perform_gap_analysis.unwrap_or(defaults.perform_gap_analysis),
            extract_entities: self.extract_entities.unwrap_or(defaults.extract_entities),
            extract_keywords: self.extract_keywords.unwrap_or(defaults.extract_keywords),
            extract_tags: self.extract_tags.unwrap_or(defaults.extract_tags),
            max_content_length: self.max_content_length.unwrap_or(defaults.max_content_length),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GapAnalysisResponse {
    pub semantic_gaps: Vec<Gap>,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": API_VERSION,
        "status": "active",
        "tagline": "See the meaning behind search",
        "description": "Content analysis and semantic gap detection for crypto SEO",
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": API_VERSION,
        "service": "semgap",
    }))
}

/// Fetch and analyze a page.
///
/// Only malformed requests fail. An unreachable page or a failed analysis
/// still answers 200 with an error-tagged report.
pub async fn crawl_url(
    State(state): State<AppState>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let request_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|e| ApiError::BadRequest { message: e.body_text(), request_id })?;

    let span = tracing::info_span!("crawl", %request_id, url = %request.url);
    crawl(state, request, request_id).instrument(span).await.map(Json)
}

async fn crawl(state: AppState, request: CrawlRequest, request_id: Uuid) -> Result<Report, ApiError> {
    parse_http_url(&request.url).map_err(|e| ApiError::InvalidUrl { message: e.to_string(), request_id })?;

    tracing::info!("Starting crawl");

    let html = match fetch_url(&request.url, &state.fetch).await {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "Fetch failed");
            return Ok(Report::from_error(&request.url, &e));
        }
    };

    let options = request.options(&state.analyzer.config().options);
    let analyzer = state.analyzer.clone();
    let url = request.url.clone();
    let span = tracing::Span::current();

    let result = tokio::task::spawn_blocking(move || {
        span.in_scope(|| analyzer.analyze_html_with_options(&html, Some(&url), &options))
    })
    .await
    .map_err(|e| ApiError::Internal { message: format!("Analysis task failed: {}", e), request_id })?;

    match result {
        Ok(report) => {
            tracing::info!(
                word_count = report.word_count,
                gaps = report.semantic_gaps.len(),
                "Crawl completed"
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            Ok(Report::from_error(&request.url, &e))
        }
    }
}

/// Run the gap rules over the built-in sample text.
pub async fn test_gap_analysis(State(state): State<AppState>) -> Json<GapAnalysisResponse> {
    tracing::info!("Starting test gap analysis");

    let keywords: Vec<String> = SAMPLE_KEYWORDS.iter().map(|kw| kw.to_string()).collect();
    let semantic_gaps = state.analyzer.evaluate_text_with(SAMPLE_TEXT, &keywords);

    tracing::info!(gaps = semantic_gaps.len(), "Test gap analysis completed");
    Json(GapAnalysisResponse { semantic_gaps })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> CrawlRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_crawl_request_defaults() {
        let options = request(r#"{"url": "https://example.com"}"#).options(&AnalysisOptions::default());
        assert_eq!(options, AnalysisOptions::default());
        assert_eq!(options.max_content_length, 50_000);
    }

    #[test]
    fn test_crawl_request_overrides() {
        let options = request(r#"{"url": "https://example.com", "perform_gap_analysis": false, "max_content_length": 100}"#)
            .options(&AnalysisOptions::default());

        assert!(!options.perform_gap_analysis);
        assert!(options.extract_entities);
        assert_eq!(options.max_content_length, 100);
    }
}
