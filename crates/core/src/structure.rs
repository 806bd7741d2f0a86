//! Structural feature extraction.
//!
//! [`StructureExtractor`] turns normalized page text and a parsed document
//! into [`DocumentFeatures`]: heading counts, lists, media, link
//! classification, paragraph statistics and the intro/conclusion/TOC
//! phrase heuristics. Extraction never fails. A document without markup
//! simply yields zero counts.

use serde::Serialize;
use url::Url;

use crate::parse::Document;

/// Countable and boolean layout properties of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentFeatures {
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub heading_count: usize,
    /// Heading texts, H1s then H2s then H3s
    pub sections: Vec<String>,
    pub has_toc: bool,
    pub has_introduction: bool,
    pub has_conclusion: bool,
    pub list_count: usize,
    pub image_count: usize,
    pub table_count: usize,
    pub code_block_count: usize,
    pub link_count: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub paragraph_count: usize,
    pub avg_paragraph_length: f64,
}

/// Derives [`DocumentFeatures`] from text and a parsed document.
///
/// Phrase sets and window sizes are public so alternate heuristics can be
/// plugged in. Phrase matching is substring based on the lowercased text.
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    pub intro_phrases: Vec<String>,
    pub conclusion_phrases: Vec<String>,
    pub toc_phrases: Vec<String>,
    /// Characters scanned from the start for intro phrases (default: 600)
    pub intro_window: usize,
    /// Characters scanned from the end for conclusion phrases (default: 600)
    pub conclusion_window: usize,
    /// Characters scanned from the start for TOC phrases (default: 800)
    pub toc_window: usize,
    /// Maximum number of section titles kept (default: 15)
    pub max_sections: usize,
}

impl Default for StructureExtractor {
    fn default() -> Self {
        Self {
            intro_phrases: to_strings(&[
                "introduction",
                "overview",
                "what is",
                "getting started",
                "in this guide",
                "this article",
                "welcome to",
                "learn about",
            ]),
            conclusion_phrases: to_strings(&[
                "conclusion",
                "summary",
                "final thoughts",
                "in summary",
                "to sum up",
                "wrapping up",
                "key takeaways",
                "in closing",
            ]),
            toc_phrases: to_strings(&["table of contents", "contents", "in this article", "overview"]),
            intro_window: 600,
            conclusion_window: 600,
            toc_window: 800,
            max_sections: 15,
        }
    }
}

impl StructureExtractor {
    /// Extract features from normalized `text` and the parsed `doc`.
    ///
    /// Links are classified against `doc.host()`. Without a host every
    /// absolute link counts as external.
    pub fn extract(&self, text: &str, doc: &Document) -> DocumentFeatures {
        let lower = text.to_lowercase();

        let h1_count = doc.count("h1");
        let h2_count = doc.count("h2");
        let h3_count = doc.count("h3");

        let sections = ["h1", "h2", "h3"]
            .iter()
            .flat_map(|tag| doc.select(tag).unwrap_or_default())
            .take(self.max_sections)
            .map(|heading| heading.text().trim().to_string())
            .collect();

        let (link_count, internal_links, external_links) = classify_links(doc);
        let (paragraph_count, avg_paragraph_length) = paragraph_stats(doc);

        DocumentFeatures {
            h1_count,
            h2_count,
            h3_count,
            heading_count: h1_count + h2_count + h3_count,
            sections,
            has_toc: contains_any(head(&lower, self.toc_window), &self.toc_phrases),
            has_introduction: contains_any(head(&lower, self.intro_window), &self.intro_phrases),
            has_conclusion: contains_any(tail(&lower, self.conclusion_window), &self.conclusion_phrases),
            list_count: doc.count("ul") + doc.count("ol"),
            image_count: doc.count("img"),
            table_count: doc.count("table"),
            code_block_count: doc.count("code") + doc.count("pre"),
            link_count,
            internal_links,
            external_links,
            paragraph_count,
            avg_paragraph_length,
        }
    }
}

/// Returns (link_count, internal, external) over `a[href]` elements
fn classify_links(doc: &Document) -> (usize, usize, usize) {
    let links = doc.select("a[href]").unwrap_or_default();
    let source = doc.base_url().map(authority);

    let mut internal = 0;
    let mut external = 0;

    for link in &links {
        let href = link.attr("href").unwrap_or_default();
        if href.starts_with("http") {
            let target = Url::parse(href).ok().map(|url| authority(&url));
            match (&source, target) {
                (Some(source), Some(target)) if *source == target => internal += 1,
                _ => external += 1,
            }
        } else if href.starts_with('/') || href.starts_with('#') {
            internal += 1;
        }
    }

    (links.len(), internal, external)
}

/// Host plus explicit port, so `example.com` and `example.com:8080` differ
fn authority(url: &Url) -> (String, Option<u16>) {
    (url.host_str().unwrap_or_default().to_string(), url.port())
}

/// Returns (paragraph_count, mean words per paragraph)
fn paragraph_stats(doc: &Document) -> (usize, f64) {
    let paragraphs = doc.select("p").unwrap_or_default();
    if paragraphs.is_empty() {
        return (0, 0.0);
    }

    let total: usize = paragraphs.iter().map(|p| p.word_count()).sum();
    (paragraphs.len(), total as f64 / paragraphs.len() as f64)
}

fn contains_any(haystack: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| haystack.contains(phrase.as_str()))
}

/// First `n` characters of `s`
fn head(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Last `n` characters of `s`
fn tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
