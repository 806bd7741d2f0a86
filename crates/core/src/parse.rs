//! Parsed page access for the structure extractor.
//!
//! A [`Document`] is the parse collaborator of the engine: the engine only
//! ever sees a parsed page, its normalized text and the resolved host.
//!
//! ```rust
//! use semgap_core::parse::Document;
//!
//! let page = "<h1>Staking</h1><h2>Validators</h2><h2>Rewards</h2><ul><li>ETH</li></ul>";
//! let doc = Document::parse(page).unwrap();
//!
//! assert_eq!(doc.count("h2"), 2);
//! assert_eq!(doc.normalized_text(), "Staking Validators Rewards ETH");
//! ```

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{Result, SemgapError};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A parsed page plus the URL it was served from.
pub struct Document {
    tree: Html,
    source: Option<Url>,
}

impl Document {
    /// Parses a page as is.
    ///
    /// Plain text without markup yields a page with no elements besides the
    /// implied `html`/`head`/`body`.
    pub fn parse(page: &str) -> Result<Self> {
        Ok(Self { tree: Html::parse_document(page), source: None })
    }

    /// Parses a page after stripping boilerplate; `source` is the URL links
    /// are classified against.
    pub fn parse_with_preprocessing(page: &str, source: Option<Url>, config: &PreprocessConfig) -> Result<Self> {
        let cleaned = preprocess_html(page, config);
        Ok(Self { tree: Html::parse_document(&cleaned), source })
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    pub fn host(&self) -> Option<&str> {
        self.source.as_ref().and_then(Url::host_str)
    }

    /// Elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// [`SemgapError::HtmlParseError`] for a malformed selector.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let compiled = compile(selector)?;
        Ok(self.tree.select(&compiled).map(|node| Element { node }).collect())
    }

    /// Number of elements matching `selector`; a malformed selector matches nothing.
    pub fn count(&self, selector: &str) -> usize {
        compile(selector).map(|compiled| self.tree.select(&compiled).count()).unwrap_or(0)
    }

    /// Trimmed `<title>` text, `None` when missing or blank
    pub fn title(&self) -> Option<String> {
        let compiled = compile("title").ok()?;
        self.tree
            .select(&compiled)
            .next()
            .map(|node| node.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    }

    /// All text nodes, trimmed and joined by single spaces.
    pub fn normalized_text(&self) -> String {
        let joined = self
            .tree
            .root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        normalize_whitespace(&joined)
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| SemgapError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Collapse every whitespace run into a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// One matched node of a [`Document`].
#[derive(Clone, Debug)]
pub struct Element<'a> {
    node: scraper::ElementRef<'a>,
}

impl Element<'_> {
    /// Concatenated descendant text, whitespace untouched
    pub fn text(&self) -> String {
        self.node.text().collect()
    }

    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.node.value().attr(name)
    }
}
