//! Report enrichment derived from coverage and ranked keywords.
//!
//! These are simple projections for presentation: topic tags, keyword
//! clusters, densities, a short summary and lists of what is missing. None of
//! them feed back into gap detection or scoring.

use std::collections::BTreeMap;

use crate::coverage::TopicsFound;
use crate::gaps::{Gap, Severity};
use crate::lexicon::sentences;
use crate::scoring::round_to;
use crate::taxonomy::Taxonomy;

const MAX_TAGS: usize = 6;
const FALLBACK_TAGS: [&str; 2] = ["Cryptocurrency", "General"];
const CLUSTERED_KEYWORDS: usize = 25;
const CLUSTER_SIZE: usize = 7;
const GENERAL_CLUSTER: &str = "General";
const DENSITY_KEYWORDS: usize = 15;
const MAX_RECOMMENDED_TOPICS: usize = 5;
const ENTITY_CANDIDATES: usize = 15;
const MAX_MISSING_ENTITIES: usize = 10;
const MAX_CONTENT_GAPS: usize = 5;

const SUMMARY_SENTENCE_CHARS: usize = 40;
const SUMMARY_CHARS: usize = 250;
const SUMMARY_SHORT_CHARS: usize = 100;
const SUMMARY_EXTRA_CHARS: usize = 150;
pub const NO_SUMMARY: &str = "No content summary available.";

/// Topic names ordered by coverage ratio, highest first
pub fn tags(topics_found: &TopicsFound) -> Vec<String> {
    if topics_found.is_empty() {
        return FALLBACK_TAGS.iter().map(|t| t.to_string()).collect();
    }

    let mut ranked: Vec<(&str, f64)> = topics_found.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(MAX_TAGS).map(|(name, _)| name.to_string()).collect()
}

/// Groups the top keywords under the first topic that lists them
pub fn semantic_clusters(keywords: &[String], taxonomy: &Taxonomy) -> BTreeMap<String, Vec<String>> {
    let mut clusters: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for keyword in keywords.iter().take(CLUSTERED_KEYWORDS) {
        let cluster = taxonomy
            .topic_for_keyword(keyword)
            .map_or(GENERAL_CLUSTER, |topic| topic.name.as_str());
        let members = clusters.entry(cluster.to_string()).or_default();
        if members.len() < CLUSTER_SIZE {
            members.push(keyword.clone());
        }
    }

    clusters
}

/// Occurrences per hundred words for the top keywords
pub fn keyword_density(text: &str, keywords: &[String], word_count: usize) -> BTreeMap<String, f64> {
    let lower = text.to_lowercase();

    keywords
        .iter()
        .take(DENSITY_KEYWORDS)
        .map(|keyword| {
            let density = if word_count == 0 {
                0.0
            } else {
                round_to(lower.matches(keyword.as_str()).count() as f64 / word_count as f64 * 100.0, 2)
            };
            (keyword.clone(), density)
        })
        .collect()
}

/// Lead sentences of the text, or its opening characters
pub fn content_summary(text: &str) -> String {
    let long_sentences: Vec<&str> = sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() > SUMMARY_SENTENCE_CHARS)
        .collect();

    let mut summary = match long_sentences.first() {
        Some(first) => truncate_chars(first, SUMMARY_CHARS),
        None if !text.is_empty() => truncate_chars(text, SUMMARY_CHARS),
        None => return NO_SUMMARY.to_string(),
    };

    if summary.chars().count() < SUMMARY_SHORT_CHARS
        && let Some(second) = long_sentences.get(1)
    {
        summary.push(' ');
        summary.push_str(&truncate_chars(second, SUMMARY_EXTRA_CHARS));
    }

    summary
}

/// Required topics that the text does not touch at all
pub fn recommended_topics(taxonomy: &Taxonomy, topics_found: &TopicsFound) -> Vec<String> {
    taxonomy
        .iter()
        .filter(|topic| topic.importance.is_required() && !topics_found.contains(&topic.name))
        .take(MAX_RECOMMENDED_TOPICS)
        .map(|topic| topic.name.clone())
        .collect()
}

/// Well-known entities neither detected nor mentioned in the text
pub fn missing_entities(known: &[String], detected: &[String], text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let detected: Vec<String> = detected.iter().map(|e| e.to_lowercase()).collect();

    known
        .iter()
        .take(ENTITY_CANDIDATES)
        .filter(|entity| {
            let entity = entity.to_lowercase();
            !detected.contains(&entity) && !lower.contains(&entity)
        })
        .take(MAX_MISSING_ENTITIES)
        .cloned()
        .collect()
}

/// Descriptions of the most severe gaps
pub fn content_gaps(gaps: &[Gap]) -> Vec<String> {
    gaps.iter()
        .filter(|gap| matches!(gap.severity, Severity::High | Severity::Medium))
        .take(MAX_CONTENT_GAPS)
        .map(|gap| gap.description.clone())
        .collect()
}

/// Mean per-sentence complexity from sentence length and word length.
///
/// Each sentence scores `words / 15 + avg_word_len / 5`, capped at 2.0.
pub fn sentence_complexity(text: &str) -> f64 {
    let pieces: Vec<&str> = sentences(text).into_iter().map(str::trim).collect();
    if pieces.is_empty() {
        return 0.0;
    }

    let total: f64 = pieces
        .iter()
        .map(|sentence| {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            let letters: usize = words.iter().map(|w| w.chars().count()).sum();
            let avg_word_len = letters as f64 / words.len().max(1) as f64;
            (words.len() as f64 / 15.0 + avg_word_len / 5.0).min(2.0)
        })
        .sum();

    total / pieces.len() as f64
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
