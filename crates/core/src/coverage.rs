//! Per-topic keyword coverage and depth estimation.
//!
//! Coverage is the share of a topic's keywords that occur (as substrings) in
//! the lowercased text. Depth is estimated from context windows of up to 100
//! characters around every keyword match. Windows are summed as-is, so
//! overlapping windows count the same words more than once. Thresholds in the
//! gap rules are calibrated against that behavior.

use regex::Regex;
use serde::Serialize;

use crate::taxonomy::{Taxonomy, Topic};

/// Characters of context captured on each side of a keyword match
pub const CONTEXT_WINDOW: usize = 100;

/// Words of estimated depth that saturate the depth score
const DEPTH_SATURATION: f64 = 100.0;

/// Coverage of a single topic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCoverage {
    pub topic: String,
    /// Topic keywords present in the text, in taxonomy order
    pub keywords_found: Vec<String>,
    pub keyword_total: usize,
    pub coverage_ratio: f64,
    /// Total words inside all keyword context windows
    pub estimated_word_count: usize,
    pub depth_score: f64,
}

impl TopicCoverage {
    pub fn is_found(&self) -> bool {
        self.coverage_ratio > 0.0
    }
}

/// Name-to-ratio map of topics with non-zero coverage, in taxonomy order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TopicsFound(Vec<(String, f64)>);

impl TopicsFound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a topic ratio. Zero ratios and repeated names are ignored.
    pub fn insert(&mut self, topic: impl Into<String>, ratio: f64) {
        let topic = topic.into();
        if ratio > 0.0 && !self.contains(&topic) {
            self.0.push((topic, ratio));
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.0.iter().any(|(name, _)| name == topic)
    }

    pub fn get(&self, topic: &str) -> Option<f64> {
        self.0.iter().find(|(name, _)| name == topic).map(|(_, ratio)| *ratio)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, ratio)| (name.as_str(), *ratio))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TopicsFound {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut found = TopicsFound::new();
        for (topic, ratio) in iter {
            found.insert(topic, ratio);
        }
        found
    }
}

/// Coverage of every topic in a taxonomy, aligned with taxonomy order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CoverageReport {
    topics: Vec<TopicCoverage>,
}

impl CoverageReport {
    pub fn topics(&self) -> &[TopicCoverage] {
        &self.topics
    }

    pub fn get(&self, topic: &str) -> Option<&TopicCoverage> {
        self.topics.iter().find(|c| c.topic == topic)
    }

    /// Topics with non-zero coverage
    pub fn topics_found(&self) -> TopicsFound {
        self.topics
            .iter()
            .filter(|c| c.is_found())
            .map(|c| (c.topic.clone(), c.coverage_ratio))
            .collect()
    }
}

/// Compiled context-window patterns for one topic
#[derive(Debug, Clone)]
struct TopicPatterns {
    windows: Vec<Regex>,
}

impl TopicPatterns {
    fn compile(topic: &Topic) -> Self {
        let windows = topic
            .keywords
            .iter()
            .filter_map(|keyword| match context_pattern(keyword) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(topic = %topic.name, keyword = %keyword, error = %e, "Skipping keyword pattern");
                    None
                }
            })
            .collect();
        Self { windows }
    }
}

fn context_pattern(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "(?i).{{0,{w}}}{kw}.{{0,{w}}}",
        w = CONTEXT_WINDOW,
        kw = regex::escape(keyword)
    ))
}

/// Computes [`TopicCoverage`] for every topic of a taxonomy.
///
/// Context-window patterns are compiled once at construction, so one
/// analyzer can be reused across documents and shared between threads.
#[derive(Debug, Clone)]
pub struct TaxonomyCoverageAnalyzer {
    taxonomy: Taxonomy,
    patterns: Vec<TopicPatterns>,
}

impl TaxonomyCoverageAnalyzer {
    pub fn new(taxonomy: Taxonomy) -> Self {
        let patterns = taxonomy.iter().map(TopicPatterns::compile).collect();
        Self { taxonomy, patterns }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Coverage for every topic, in taxonomy order
    pub fn analyze(&self, text: &str) -> CoverageReport {
        let lower = text.to_lowercase();
        let topics = self
            .taxonomy
            .iter()
            .zip(&self.patterns)
            .map(|(topic, patterns)| coverage_with(&lower, topic, &patterns.windows))
            .collect();

        CoverageReport { topics }
    }
}

/// Coverage of a single topic, compiling its patterns on the fly
pub fn analyze_topic(text: &str, topic: &Topic) -> TopicCoverage {
    let patterns = TopicPatterns::compile(topic);
    coverage_with(&text.to_lowercase(), topic, &patterns.windows)
}

fn coverage_with(lower: &str, topic: &Topic, windows: &[Regex]) -> TopicCoverage {
    let keywords_found: Vec<String> =
        topic.keywords.iter().filter(|kw| lower.contains(kw.as_str())).cloned().collect();

    let keyword_total = topic.keywords.len();
    let coverage_ratio =
        if keyword_total == 0 { 0.0 } else { keywords_found.len() as f64 / keyword_total as f64 };

    let estimated_word_count: usize = windows
        .iter()
        .flat_map(|re| re.find_iter(lower))
        .map(|m| m.as_str().split_whitespace().count())
        .sum();

    TopicCoverage {
        topic: topic.name.clone(),
        keywords_found,
        keyword_total,
        coverage_ratio,
        estimated_word_count,
        depth_score: (estimated_word_count as f64 / DEPTH_SATURATION).min(1.0),
    }
}
