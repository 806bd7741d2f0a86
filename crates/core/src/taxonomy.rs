//! Subject-matter taxonomy used to judge topic coverage.
//!
//! A [`Taxonomy`] is an ordered table of [`Topic`]s. Order is significant:
//! it is the iteration order of the per-topic gap rules and the tie-break
//! order when keywords are clustered by topic. A taxonomy is validated once
//! when it is built and is read-only afterwards, so a single instance can be
//! shared by any number of concurrent analyses.
//!
//! Taxonomy documents are JSON:
//!
//! ```json
//! {
//!   "topics": [
//!     {
//!       "name": "Security",
//!       "keywords": ["wallet", "private key"],
//!       "subtopics": ["Wallet security"],
//!       "importance": "critical",
//!       "min_word_count": 100
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Result, SemgapError};

/// Importance tier of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    Medium,
}

impl Importance {
    /// Whether a complete absence of the topic is reported as a gap
    pub fn is_required(self) -> bool {
        matches!(self, Importance::Critical | Importance::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Critical => "critical",
            Importance::High => "high",
            Importance::Medium => "medium",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named subject area with its keyword set and depth threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    /// Lowercase, unique, in declared order
    pub keywords: Vec<String>,
    #[serde(default)]
    pub subtopics: Vec<String>,
    pub importance: Importance,
    pub min_word_count: usize,
}

impl Topic {
    pub fn new(
        name: &str, keywords: &[&str], subtopics: &[&str], importance: Importance, min_word_count: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            subtopics: subtopics.iter().map(|s| s.to_string()).collect(),
            importance,
            min_word_count,
        }
    }

    /// Whether `keyword` belongs to this topic's keyword set
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Lowercase, trim and deduplicate keywords, preserving first occurrence
    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.name = self.name.trim().to_string();
        self.keywords = self
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();
    }
}

/// On-disk shape of a taxonomy document
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    topics: Vec<Topic>,
}

/// Ordered, validated, immutable table of topics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Taxonomy {
    topics: Vec<Topic>,
}

impl Taxonomy {
    /// Build a taxonomy, normalizing keywords and checking its invariants
    ///
    /// # Errors
    ///
    /// Returns [`SemgapError::TaxonomyError`] when there are no topics, a
    /// topic name is empty or repeated, or a topic has no keywords.
    pub fn new(topics: Vec<Topic>) -> Result<Self> {
        if topics.is_empty() {
            return Err(SemgapError::TaxonomyError("taxonomy has no topics".to_string()));
        }

        let mut names = HashSet::new();
        let mut normalized = Vec::with_capacity(topics.len());

        for mut topic in topics {
            topic.normalize();

            if topic.name.is_empty() {
                return Err(SemgapError::TaxonomyError("topic name is empty".to_string()));
            }
            if !names.insert(topic.name.clone()) {
                return Err(SemgapError::TaxonomyError(format!("duplicate topic '{}'", topic.name)));
            }
            if topic.keywords.is_empty() {
                return Err(SemgapError::TaxonomyError(format!("topic '{}' has no keywords", topic.name)));
            }

            normalized.push(topic);
        }

        Ok(Self { topics: normalized })
    }

    /// Parse a taxonomy from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TaxonomyFile =
            serde_json::from_str(json).map_err(|e| SemgapError::TaxonomyError(e.to_string()))?;
        Self::new(file.topics)
    }

    /// Read and parse a taxonomy JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SemgapError::FileNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The built-in cryptocurrency taxonomy
    pub fn builtin() -> Self {
        Self { topics: builtin_topics() }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// First topic, in declared order, whose keyword set contains `keyword`
    pub fn topic_for_keyword(&self, keyword: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.has_keyword(keyword))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Taxonomy {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}

fn builtin_topics() -> Vec<Topic> {
    vec![
        Topic::new(
            "Fundamentals",
            &[
                "blockchain", "bitcoin", "ethereum", "cryptocurrency", "decentralized", "consensus", "mining",
                "proof of work", "proof of stake", "distributed ledger", "cryptography", "hash", "node", "network",
            ],
            &[
                "What is blockchain", "How crypto works", "Consensus mechanisms", "Cryptography basics",
                "Network architecture",
            ],
            Importance::Critical,
            150,
        ),
        Topic::new(
            "Trading",
            &[
                "trading", "exchange", "buy", "sell", "order", "market", "limit", "stop loss", "candlestick",
                "technical analysis", "volume", "liquidity", "volatility", "arbitrage", "portfolio", "token swap",
                "conversion", "swap",
            ],
            &[
                "Trading strategies", "Chart patterns", "Risk management", "Order types", "Market analysis",
                "Token swap process", "Conversion mechanics",
            ],
            Importance::High,
            100,
        ),
        Topic::new(
            "DeFi",
            &[
                "defi", "yield", "liquidity", "amm", "dex", "lending", "borrowing", "staking", "farming", "protocol",
                "smart contract", "uniswap", "compound", "aave",
            ],
            &["Liquidity pools", "Yield farming", "Lending protocols", "DEX mechanics", "Impermanent loss"],
            Importance::High,
            100,
        ),
        Topic::new(
            "Security",
            &[
                "wallet", "private key", "seed phrase", "security", "custody", "cold storage", "hardware wallet",
                "2fa", "phishing", "multisig", "recovery", "backup",
            ],
            &["Wallet security", "Key management", "Scam prevention", "Best practices", "Recovery methods"],
            Importance::Critical,
            100,
        ),
        Topic::new(
            "NFTs",
            &[
                "nft", "non-fungible", "collectible", "metadata", "opensea", "mint", "royalty", "erc-721", "erc-1155",
                "digital art",
            ],
            &["NFT standards", "Minting process", "NFT marketplaces", "Use cases", "Valuation"],
            Importance::Medium,
            80,
        ),
        Topic::new(
            "Regulation",
            &["regulation", "compliance", "kyc", "aml", "tax", "legal", "sec", "license", "government", "law"],
            &["Regulatory landscape", "Tax implications", "Compliance requirements", "Legal considerations"],
            Importance::High,
            100,
        ),
        Topic::new(
            "Technology",
            &[
                "smart contract", "solidity", "evm", "layer 2", "scalability", "sharding", "rollup", "oracle",
                "consensus", "validator",
            ],
            &["Smart contracts", "Scaling solutions", "Layer 2", "Cross-chain", "Oracles"],
            Importance::High,
            100,
        ),
        Topic::new(
            "Economics",
            &[
                "tokenomics", "inflation", "deflation", "supply", "distribution", "halving", "burning", "vesting",
                "market cap", "utility",
            ],
            &["Token economics", "Monetary policy", "Distribution models", "Incentive structures"],
            Importance::Medium,
            80,
        ),
    ]
}

/// Resolves which taxonomy an analyzer should use.
///
/// Lookup order: an explicit path, then `taxonomy.json` in the config
/// directory (`~/.config/semgap` by default), then the built-in table.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyLoader {
    path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

impl TaxonomyLoader {
    /// Loader that searches the default config directory
    pub fn new() -> Self {
        Self { path: None, config_dir: Self::default_config_dir() }
    }

    /// Use an explicit taxonomy file; a missing file is an error
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Search `taxonomy.json` in this directory instead of the default one
    pub fn config_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Resolve and load the taxonomy
    pub fn load(&self) -> Result<Taxonomy> {
        if let Some(path) = &self.path {
            tracing::debug!(path = %path.display(), "Loading taxonomy from explicit path");
            return Taxonomy::from_file(path);
        }

        if let Some(dir) = &self.config_dir {
            let candidate = dir.join("taxonomy.json");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Loading taxonomy from config directory");
                return Taxonomy::from_file(&candidate);
            }
        }

        Ok(Taxonomy::builtin())
    }

    /// Default config directory (~/.config/semgap)
    fn default_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("semgap"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_taxonomy_shape() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.len(), 8);

        let names: Vec<&str> = taxonomy.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Fundamentals", "Trading", "DeFi", "Security", "NFTs", "Regulation", "Technology", "Economics"]
        );

        let security = taxonomy.get("Security").unwrap();
        assert_eq!(security.importance, Importance::Critical);
        assert_eq!(security.min_word_count, 100);
        assert_eq!(security.keywords.len(), 12);
    }

    #[test]
    fn test_builtin_is_already_normalized() {
        let builtin = Taxonomy::builtin();
        let revalidated = Taxonomy::new(builtin.topics().to_vec()).unwrap();
        assert_eq!(builtin, revalidated);
    }

    #[test]
    fn test_from_json_normalizes_keywords() {
        let json = r#"{
            "topics": [
                {
                    "name": "Security",
                    "keywords": ["Wallet", " wallet ", "Seed Phrase", ""],
                    "subtopics": ["Wallet security"],
                    "importance": "critical",
                    "min_word_count": 100
                }
            ]
        }"#;

        let taxonomy = Taxonomy::from_json(json).unwrap();
        let topic = taxonomy.get("Security").unwrap();
        assert_eq!(topic.keywords, vec!["wallet", "seed phrase"]);
    }

    #[test]
    fn test_subtopics_default_to_empty() {
        let json = r#"{"topics": [{"name": "A", "keywords": ["x"], "importance": "medium", "min_word_count": 10}]}"#;
        let taxonomy = Taxonomy::from_json(json).unwrap();
        assert!(taxonomy.topics()[0].subtopics.is_empty());
    }

    #[test]
    fn test_rejects_invalid_taxonomies() {
        assert!(matches!(Taxonomy::from_json(r#"{"topics": []}"#), Err(SemgapError::TaxonomyError(_))));
        assert!(matches!(Taxonomy::from_json("not json"), Err(SemgapError::TaxonomyError(_))));

        let duplicate = r#"{"topics": [
            {"name": "A", "keywords": ["x"], "importance": "high", "min_word_count": 1},
            {"name": "A", "keywords": ["y"], "importance": "high", "min_word_count": 1}
        ]}"#;
        assert!(matches!(Taxonomy::from_json(duplicate), Err(SemgapError::TaxonomyError(_))));

        let no_keywords = r#"{"topics": [{"name": "A", "keywords": [" "], "importance": "high", "min_word_count": 1}]}"#;
        assert!(matches!(Taxonomy::from_json(no_keywords), Err(SemgapError::TaxonomyError(_))));

        let bad_importance = r#"{"topics": [{"name": "A", "keywords": ["x"], "importance": "low", "min_word_count": 1}]}"#;
        assert!(matches!(Taxonomy::from_json(bad_importance), Err(SemgapError::TaxonomyError(_))));
    }

    #[test]
    fn test_topic_for_keyword_uses_declared_order() {
        let taxonomy = Taxonomy::builtin();
        // "liquidity" is in both Trading and DeFi, "smart contract" in DeFi and Technology
        assert_eq!(taxonomy.topic_for_keyword("liquidity").unwrap().name, "Trading");
        assert_eq!(taxonomy.topic_for_keyword("smart contract").unwrap().name, "DeFi");
        assert!(taxonomy.topic_for_keyword("banana").is_none());
    }

    #[test]
    fn test_importance_is_required() {
        assert!(Importance::Critical.is_required());
        assert!(Importance::High.is_required());
        assert!(!Importance::Medium.is_required());
        assert_eq!(Importance::High.to_string(), "high");
    }

    #[test]
    fn test_loader_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(
            &path,
            r#"{"topics": [{"name": "Gardening", "keywords": ["soil"], "importance": "high", "min_word_count": 50}]}"#,
        )
        .unwrap();

        let taxonomy = TaxonomyLoader::new().path(&path).load().unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.topics()[0].name, "Gardening");
    }

    #[test]
    fn test_loader_missing_explicit_path() {
        let result = TaxonomyLoader::new().path("/nonexistent/taxonomy.json").load();
        assert!(matches!(result, Err(SemgapError::FileNotFound(_))));
    }

    #[test]
    fn test_loader_config_dir_then_builtin() {
        let dir = TempDir::new().unwrap();

        let taxonomy = TaxonomyLoader::default().config_dir(dir.path()).load().unwrap();
        assert_eq!(taxonomy, Taxonomy::builtin());

        fs::write(
            dir.path().join("taxonomy.json"),
            r#"{"topics": [{"name": "Cooking", "keywords": ["recipe"], "importance": "medium", "min_word_count": 50}]}"#,
        )
        .unwrap();

        let taxonomy = TaxonomyLoader::default().config_dir(dir.path()).load().unwrap();
        assert_eq!(taxonomy.topics()[0].name, "Cooking");
    }
}
