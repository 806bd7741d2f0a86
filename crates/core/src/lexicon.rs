//! Lexical feature extraction: ranked keywords and named entities.
//!
//! The gap engine only consumes a ranked keyword list, so tokenization sits
//! behind the [`LexicalExtractor`] trait. [`FrequencyExtractor`] is the
//! default, a plain frequency count over lowercase words with stop words
//! removed.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static LOWERCASE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").unwrap());
static CAPITALIZED_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]{2,}(?:\s+[A-Z][a-z]+)*\b").unwrap());
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

const ENTITIES: &[&str] = &[
    "Bitcoin", "BTC", "Ethereum", "ETH", "Binance", "BNB", "Cardano", "Solana", "Polygon", "Avalanche", "DeFi", "NFT",
    "DAO", "Web3", "MetaMask", "Coinbase", "Uniswap", "OpenSea", "Chainlink",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "from", "have", "been", "will", "your", "more", "when", "about", "they",
    "their", "which", "would", "there", "these", "what", "some", "other", "into", "than", "them", "could", "only",
    "over", "such", "our", "also", "where", "after", "just", "very", "even",
];

/// Recognized entity names and stop words
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    entities: Vec<String>,
    stop_words: HashSet<String>,
}

impl Lexicon {
    pub fn new<E, S>(entities: E, stop_words: S) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            entities: entities.into_iter().map(Into::into).collect(),
            stop_words: stop_words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }

    /// Built-in cryptocurrency entity list and English stop words
    pub fn builtin() -> Self {
        Self::new(ENTITIES.iter().copied(), STOP_WORDS.iter().copied())
    }

    /// Known entities in declared order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Case-insensitive stop word check
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Source of ranked keywords and recognized entities for a text
pub trait LexicalExtractor: Send + Sync {
    /// Keywords ranked by importance, lowercase, stop words excluded
    fn extract_keywords(&self, text: &str) -> Vec<String>;

    /// Named entities mentioned in the text
    fn extract_entities(&self, text: &str) -> Vec<String>;
}

/// Frequency-ranked keyword and lexicon-driven entity extraction
#[derive(Debug, Clone)]
pub struct FrequencyExtractor {
    lexicon: Lexicon,
    /// Maximum number of ranked keywords (default: 40)
    pub max_keywords: usize,
    /// Maximum number of entities returned (default: 30)
    pub max_entities: usize,
    /// Maximum number of capitalized phrases considered (default: 25)
    pub max_capitalized_phrases: usize,
}

impl FrequencyExtractor {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon, max_keywords: 40, max_entities: 30, max_capitalized_phrases: 25 }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl Default for FrequencyExtractor {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl LexicalExtractor for FrequencyExtractor {
    fn extract_keywords(&self, text: &str) -> Vec<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for word in lowercase_words(text) {
            if self.lexicon.is_stop_word(&word) {
                continue;
            }
            match index.get(&word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.clone(), counts.len());
                    counts.push((word, 1));
                }
            }
        }

        // stable: equal counts keep first-occurrence order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(self.max_keywords).map(|(word, _)| word).collect()
    }

    fn extract_entities(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut entities: BTreeSet<String> = self
            .lexicon
            .entities()
            .iter()
            .filter(|entity| lower.contains(&entity.to_lowercase()))
            .cloned()
            .collect();

        entities.extend(
            CAPITALIZED_PHRASE
                .find_iter(text)
                .map(|m| m.as_str())
                .filter(|phrase| phrase.chars().count() > 4 && !self.lexicon.is_stop_word(phrase))
                .take(self.max_capitalized_phrases)
                .map(str::to_string),
        );

        entities.into_iter().take(self.max_entities).collect()
    }
}

/// Lowercase alphabetic words of three or more letters, in text order
pub fn lowercase_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    LOWERCASE_WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Sentences split on runs of terminal punctuation, blank pieces dropped
///
/// Pieces are returned untrimmed.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK.split(text).filter(|s| !s.trim().is_empty()).collect()
}

pub fn sentence_count(text: &str) -> usize {
    sentences(text).len()
}
