//! Analysis report with scores, gaps, enrichment, and format conversion.
//!
//! A [`Report`] is the complete result of analyzing one page. When fetching
//! or parsing fails the engine never runs and the report carries only the
//! URL, an `error` message and the timestamp.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::coverage::TopicCoverage;
use crate::formatters::{
    JsonConfig, MarkdownConfig, TextConfig, convert_to_json, convert_to_markdown, convert_to_text,
};
use crate::gaps::Gap;
use crate::scoring::Scores;
use crate::structure::DocumentFeatures;
use crate::{Result, SemgapError};

/// Warning attached when gap analysis ran and found nothing
pub const NO_GAPS_WARNING: &str = "No semantic gaps detected. The content may fully cover the target topic. \
     Try a different URL or adjust the taxonomy for more specific analysis.";

/// Output format options for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured JSON
    Json,
    /// Markdown with TOML frontmatter
    Markdown,
    /// Plain text summary
    Text,
}

/// The complete result of analyzing a page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub url: String,
    pub title: Option<String>,
    /// Meta description of the unstripped page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub word_count: usize,
    pub entities: Vec<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    /// Topics with non-zero coverage, in taxonomy order
    pub key_topics: Vec<String>,
    pub content_summary: Option<String>,
    pub semantic_clusters: BTreeMap<String, Vec<String>>,

    /// Scores rounded to three decimals
    #[serde(flatten)]
    pub scores: Scores,
    pub sentence_complexity: f64,

    pub content_gaps: Vec<String>,
    pub semantic_gaps: Vec<Gap>,
    pub missing_entities: Vec<String>,
    pub recommended_topics: Vec<String>,
    pub keyword_density: BTreeMap<String, f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<DocumentFeatures>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topic_coverage: Vec<TopicCoverage>,

    /// Seconds since the Unix epoch
    pub crawl_timestamp: f64,
    pub error: Option<String>,
    pub warning: Option<String>,
}

impl Report {
    /// Report for a page that could not be analyzed
    pub fn failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self { url: url.into(), error: Some(message.into()), crawl_timestamp: now_timestamp(), ..Default::default() }
    }

    /// Error-tagged report, distinguishing fetch failures from analysis failures
    pub fn from_error(url: impl Into<String>, err: &SemgapError) -> Self {
        let message = if err.is_fetch_failure() {
            format!("Failed to fetch URL: {}", err)
        } else {
            format!("Analysis failed: {}", err)
        };
        Self::failed(url, message)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Timestamp as an RFC 3339 string, if representable
    pub fn crawled_at(&self) -> Option<String> {
        let nanos = (self.crawl_timestamp * 1_000_000_000.0) as i128;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?.format(&Rfc3339).ok()
    }

    /// Converts the report to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => self.to_json_string(&JsonConfig::default()),
            OutputFormat::Markdown => convert_to_markdown(self, &MarkdownConfig::default()),
            OutputFormat::Text => convert_to_text(self, &TextConfig::default()),
        }
    }

    /// Gets the report as a `serde_json::Value`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(SemgapError::from)
    }

    pub fn to_json_string(&self, config: &JsonConfig) -> Result<String> {
        convert_to_json(self, config)
    }
}

/// Current time in fractional seconds since the Unix epoch
pub fn now_timestamp() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1_000_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_report() {
        let report = Report::failed("https://example.com", "Analysis failed: boom");

        assert!(report.is_error());
        assert_eq!(report.word_count, 0);
        assert!(report.structure.is_none());
        assert!(report.semantic_gaps.is_empty());
        assert!(report.crawl_timestamp > 0.0);
    }

    #[test]
    fn test_from_error_prefixes() {
        let fetch = Report::from_error("https://example.com", &SemgapError::Timeout { timeout: 15 });
        assert!(fetch.error.as_deref().unwrap().starts_with("Failed to fetch URL:"));

        let status =
            Report::from_error("https://example.com", &SemgapError::HttpStatus { status: 404, url: "x".into() });
        assert!(status.error.as_deref().unwrap().starts_with("Failed to fetch URL:"));

        let other = Report::from_error("https://example.com", &SemgapError::NoContent);
        assert!(other.error.as_deref().unwrap().starts_with("Analysis failed:"));
    }

    #[test]
    fn test_json_shape() {
        let report = Report::failed("https://example.com", "Analysis failed: boom");
        let json = report.to_json().unwrap();

        assert_eq!(json["url"], "https://example.com");
        assert!(json["title"].is_null());
        assert_eq!(json["seo_score"], 0.0);
        assert!(json.get("scores").is_none());
        assert!(json.get("structure").is_none());
        assert!(json["warning"].is_null());
    }

    #[test]
    fn test_crawled_at() {
        let report = Report { crawl_timestamp: 0.0, ..Default::default() };
        assert_eq!(report.crawled_at().as_deref(), Some("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_to_format_variants() {
        let report = Report::failed("https://example.com", "Failed to fetch URL: timeout");

        let json = report.to_format(OutputFormat::Json).unwrap();
        assert!(json.contains("\"error\""));

        let markdown = report.to_format(OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("+++"));

        let text = report.to_format(OutputFormat::Text).unwrap();
        assert!(text.contains("Failed to fetch URL"));
    }
}
