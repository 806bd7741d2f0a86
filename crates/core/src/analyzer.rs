//! Main content analysis API.
//!
//! This module provides the primary API for analyzing web pages. The main
//! entry point is the [`Analyzer`] struct, along with convenience functions
//! like [`analyze`] and [`fetch_and_analyze`].
//!
//! # Example
//!
//! ```rust
//! use semgap_core::analyzer::analyze;
//!
//! let html = "<html><head><title>Wallets</title></head><body><h1>Wallets</h1><p>Keep your seed phrase offline.</p></body></html>";
//! let report = analyze(html).unwrap();
//! assert_eq!(report.title.as_deref(), Some("Wallets"));
//! assert!(!report.semantic_gaps.is_empty());
//! ```

use url::Url;

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_url};

use crate::coverage::TaxonomyCoverageAnalyzer;
use crate::gaps::{Gap, GapInputs, GapRuleEngine, GapThresholds};
use crate::insights;
use crate::lexicon::{FrequencyExtractor, LexicalExtractor, Lexicon, word_count};
use crate::metadata::PageMetadata;
use crate::parse::{Document, normalize_whitespace};
use crate::preprocess::PreprocessConfig;
use crate::report::{NO_GAPS_WARNING, Report, now_timestamp};
use crate::scoring::{ScoreAggregator, ScoreConfig, ScoreInputs, TextProfile};
use crate::structure::StructureExtractor;
use crate::taxonomy::Taxonomy;
use crate::{Result, SemgapError};

/// Which parts of the analysis run and end up in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Run the gap rules (default: true).
    pub perform_gap_analysis: bool,
    /// Detect named entities and missing entities (default: true).
    pub extract_entities: bool,
    /// Report keywords, clusters and densities (default: true).
    pub extract_keywords: bool,
    /// Report topic tags (default: true).
    pub extract_tags: bool,
    /// Maximum characters of page text handed to keyword and entity
    /// extraction and the enrichment projections (0 = unlimited, default: 50000).
    /// Structure, coverage, gaps and scores always see the whole page.
    pub max_content_length: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            perform_gap_analysis: true,
            extract_entities: true,
            extract_keywords: true,
            extract_tags: true,
            max_content_length: 50_000,
        }
    }
}

/// Configuration for the analyzer.
///
/// # Example
///
/// ```rust
/// use semgap_core::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .perform_gap_analysis(false)
///     .max_content_length(10_000)
///     .build();
/// assert!(!config.options.perform_gap_analysis);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Thresholds of the gap rules.
    pub thresholds: GapThresholds,
    /// Weights and tiers of the composite scores.
    pub scoring: ScoreConfig,
    /// Boilerplate stripped before analysis.
    pub preprocess: PreprocessConfig,
    /// Analysis toggles and limits.
    pub options: AnalysisOptions,
}

impl AnalyzerConfig {
    /// Creates a new builder for AnalyzerConfig.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::new()
    }
}

/// Builder for AnalyzerConfig.
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: AnalyzerConfig::default() }
    }

    /// Sets the gap rule thresholds.
    pub fn thresholds(mut self, value: GapThresholds) -> Self {
        self.config.thresholds = value;
        self
    }

    /// Sets the score weights and tiers.
    pub fn scoring(mut self, value: ScoreConfig) -> Self {
        self.config.scoring = value;
        self
    }

    /// Sets which boilerplate elements are stripped.
    pub fn preprocess(mut self, value: PreprocessConfig) -> Self {
        self.config.preprocess = value;
        self
    }

    /// Sets whether gap analysis runs.
    pub fn perform_gap_analysis(mut self, value: bool) -> Self {
        self.config.options.perform_gap_analysis = value;
        self
    }

    /// Sets whether entities are extracted.
    pub fn extract_entities(mut self, value: bool) -> Self {
        self.config.options.extract_entities = value;
        self
    }

    /// Sets whether keywords are reported.
    pub fn extract_keywords(mut self, value: bool) -> Self {
        self.config.options.extract_keywords = value;
        self
    }

    /// Sets whether topic tags are reported.
    pub fn extract_tags(mut self, value: bool) -> Self {
        self.config.options.extract_tags = value;
        self
    }

    /// Sets the maximum analyzed text length in characters.
    pub fn max_content_length(mut self, value: usize) -> Self {
        self.config.options.max_content_length = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}

impl Default for AnalyzerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for AnalyzerConfig.
pub type SemgapConfig = AnalyzerConfig;

/// Type alias for AnalyzerConfigBuilder.
pub type SemgapConfigBuilder = AnalyzerConfigBuilder;

/// Main entry point for content analysis.
///
/// An analyzer owns its taxonomy, lexicon and configuration. It is
/// immutable once built, so a single instance can be shared between threads
/// and reused for every request.
///
/// # Example
///
/// ```rust
/// use semgap_core::{Analyzer, Taxonomy};
///
/// let analyzer = Analyzer::new().with_taxonomy(Taxonomy::builtin());
/// let report = analyzer.analyze_html("<h1>Staking</h1><p>Validators earn yield.</p>", None).unwrap();
/// assert!(report.key_topics.contains(&"DeFi".to_string()));
/// ```
pub struct Analyzer {
    config: AnalyzerConfig,
    coverage: TaxonomyCoverageAnalyzer,
    structure: StructureExtractor,
    gaps: GapRuleEngine,
    scores: ScoreAggregator,
    lexicon: Lexicon,
    extractor: Box<dyn LexicalExtractor>,
}

impl Analyzer {
    /// Creates an analyzer with the built-in taxonomy and default settings.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Creates an analyzer with the built-in taxonomy and a custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self::with_taxonomy_and_config(Taxonomy::builtin(), config)
    }

    /// Creates an analyzer over `taxonomy` with a custom configuration.
    ///
    /// Keyword patterns are compiled here once; prefer this over
    /// `with_config(..).with_taxonomy(..)`, which compiles the built-in set first.
    pub fn with_taxonomy_and_config(taxonomy: Taxonomy, config: AnalyzerConfig) -> Self {
        let lexicon = Lexicon::builtin();
        Self {
            coverage: TaxonomyCoverageAnalyzer::new(taxonomy),
            structure: StructureExtractor::default(),
            gaps: GapRuleEngine::new(config.thresholds.clone()),
            scores: ScoreAggregator::new(config.scoring.clone()),
            extractor: Box::new(FrequencyExtractor::new(lexicon.clone())),
            lexicon,
            config,
        }
    }

    /// Replaces the taxonomy.
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.coverage = TaxonomyCoverageAnalyzer::new(taxonomy);
        self
    }

    /// Replaces the lexicon and resets the extractor to a frequency extractor over it.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.extractor = Box::new(FrequencyExtractor::new(lexicon.clone()));
        self.lexicon = lexicon;
        self
    }

    /// Replaces the keyword and entity extractor.
    pub fn with_extractor<E: LexicalExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replaces the structure heuristics.
    pub fn with_structure_extractor(mut self, structure: StructureExtractor) -> Self {
        self.structure = structure;
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        self.coverage.taxonomy()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes an HTML document.
    ///
    /// # Arguments
    ///
    /// * `html` - The HTML content to analyze
    /// * `url` - Source URL, used for the report and to classify links
    ///
    /// # Errors
    ///
    /// Returns [`SemgapError::NoContent`] for blank input and
    /// [`SemgapError::InvalidUrl`] if the URL cannot be parsed.
    pub fn analyze_html(&self, html: &str, url: Option<&str>) -> Result<Report> {
        self.analyze_html_with_options(html, url, &self.config.options)
    }

    /// Analyzes an HTML document with per-call options.
    ///
    /// `options` replace the configured analysis options for this call only.
    pub fn analyze_html_with_options(
        &self,
        html: &str,
        url: Option<&str>,
        options: &AnalysisOptions,
    ) -> Result<Report> {
        if html.trim().is_empty() {
            return Err(SemgapError::NoContent);
        }

        let base_url = url
            .map(|u| Url::parse(u).map_err(|e| SemgapError::InvalidUrl(e.to_string())))
            .transpose()?;

        let metadata = Document::parse(html)?.extract_metadata();
        let doc = Document::parse_with_preprocessing(html, base_url, &self.config.preprocess)?;
        let text = doc.normalized_text();

        tracing::info!(url = url.unwrap_or_default(), title = %metadata.title, "Analyzing document");

        Ok(self.analyze_document(&doc, &text, metadata, url.unwrap_or_default(), options))
    }

    /// Runs only the gap rules over plain text.
    ///
    /// The text is treated as a document without markup, so every
    /// structural count is zero.
    pub fn evaluate_text(&self, text: &str) -> Vec<Gap> {
        let keywords = self.extractor.extract_keywords(&normalize_whitespace(text));
        self.evaluate_text_with(text, &keywords)
    }

    /// Runs only the gap rules over plain text with caller-supplied keywords.
    pub fn evaluate_text_with(&self, text: &str, keywords: &[String]) -> Vec<Gap> {
        let text = normalize_whitespace(text);
        let doc = match Document::parse(&text) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse text");
                return Vec::new();
            }
        };

        let features = self.structure.extract(&text, &doc);
        let coverage = self.coverage.analyze(&text);
        let inputs = GapInputs { features: &features, coverage: &coverage, word_count: word_count(&text), keywords };

        self.gaps.evaluate(self.taxonomy(), &inputs)
    }

    /// Fetches a URL and analyzes the page.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_analyze(&self, url: &str, fetch_config: &FetchConfig) -> Result<Report> {
        let html = fetch_url(url, fetch_config).await?;
        self.analyze_html(&html, Some(url))
    }

    /// Fetches and analyzes a URL, folding any failure into the report.
    ///
    /// Never fails: fetch and parse errors produce a report whose `error`
    /// field is set and which carries no analysis data.
    #[cfg(feature = "fetch")]
    pub async fn crawl(&self, url: &str, fetch_config: &FetchConfig) -> Report {
        match self.fetch_and_analyze(url, fetch_config).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(url, error = %e, "Crawl failed");
                Report::from_error(url, &e)
            }
        }
    }

    fn analyze_document(
        &self,
        doc: &Document,
        text: &str,
        metadata: PageMetadata,
        url: &str,
        options: &AnalysisOptions,
    ) -> Report {
        let taxonomy = self.taxonomy();
        let words = word_count(text);
        let lexical = truncate_chars(text, options.max_content_length);
        if lexical.len() < text.len() {
            tracing::debug!(limit = options.max_content_length, "Lexical input truncated");
        }

        let features = self.structure.extract(text, doc);
        tracing::info!(
            word_count = words,
            h1 = features.h1_count,
            h2 = features.h2_count,
            h3 = features.h3_count,
            lists = features.list_count,
            images = features.image_count,
            links = features.link_count,
            "Structure extracted"
        );

        let keywords = self.extractor.extract_keywords(lexical);
        let entities = if options.extract_entities { self.extractor.extract_entities(lexical) } else { Vec::new() };

        let coverage = self.coverage.analyze(text);
        let topics_found = coverage.topics_found();
        tracing::info!(topics = ?topics_found.names(), "Topics found");

        let gaps = if options.perform_gap_analysis {
            let inputs = GapInputs { features: &features, coverage: &coverage, word_count: words, keywords: &keywords };
            self.gaps.evaluate(taxonomy, &inputs)
        } else {
            Vec::new()
        };

        let profile = TextProfile::from_text(text);
        let scores = self
            .scores
            .score(&ScoreInputs {
                features: &features,
                topics_found: &topics_found,
                taxonomy_size: taxonomy.len(),
                word_count: words,
                title: &metadata.title,
                keywords: &keywords,
                profile: &profile,
            })
            .rounded();
        tracing::info!(
            quality = scores.content_quality_score,
            seo = scores.seo_score,
            readability = scores.readability_score,
            relevance = scores.topic_relevance_score,
            "Scores computed"
        );

        let warning = (options.perform_gap_analysis && gaps.is_empty()).then(|| NO_GAPS_WARNING.to_string());

        Report {
            url: url.to_string(),
            title: Some(metadata.title),
            description: metadata.description,
            language: metadata.language,
            word_count: words,
            tags: if options.extract_tags { insights::tags(&topics_found) } else { Vec::new() },
            key_topics: topics_found.names(),
            content_summary: Some(insights::content_summary(lexical)),
            semantic_clusters: if options.extract_keywords {
                insights::semantic_clusters(&keywords, taxonomy)
            } else {
                Default::default()
            },
            keyword_density: if options.extract_keywords {
                insights::keyword_density(lexical, &keywords, word_count(lexical))
            } else {
                Default::default()
            },
            keywords: if options.extract_keywords { keywords.iter().take(30).cloned().collect() } else { Vec::new() },
            scores,
            sentence_complexity: insights::sentence_complexity(lexical),
            content_gaps: insights::content_gaps(&gaps),
            recommended_topics: insights::recommended_topics(taxonomy, &topics_found),
            missing_entities: if options.extract_entities {
                insights::missing_entities(self.lexicon.entities(), &entities, lexical)
            } else {
                Vec::new()
            },
            entities,
            semantic_gaps: gaps,
            structure: Some(features),
            topic_coverage: coverage.topics().to_vec(),
            crawl_timestamp: now_timestamp(),
            error: None,
            warning,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// First `max` characters of `text` (0 = unlimited)
fn truncate_chars(text: &str, max: usize) -> &str {
    if max == 0 {
        return text;
    }
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Convenience function for one-liner analysis with defaults.
///
/// # Example
///
/// ```rust
/// use semgap_core::analyzer::analyze;
///
/// let report = analyze("<p>Bitcoin is a cryptocurrency.</p>").unwrap();
/// assert_eq!(report.word_count, 4);
/// ```
pub fn analyze(html: &str) -> Result<Report> {
    Analyzer::new().analyze_html(html, None)
}

/// Convenience function for one-liner analysis with URL context.
///
/// # Errors
///
/// Returns [`SemgapError::InvalidUrl`] if the URL is invalid.
pub fn analyze_with_url(html: &str, url: &str) -> Result<Report> {
    Analyzer::new().analyze_html(html, Some(url))
}

/// Fetch a URL and analyze it with default settings.
#[cfg(feature = "fetch")]
pub async fn fetch_and_analyze(url: &str) -> Result<Report> {
    Analyzer::new().fetch_and_analyze(url, &FetchConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaps::{GapRule, Severity};
    use crate::taxonomy::{Importance, Topic};

    const SAMPLE_TEXT: &str = "
        Bitcoin is a cryptocurrency. It uses blockchain technology. Ethereum is another popular coin.
        This article explains crypto basics. No conclusion here.
    ";

    const GUIDE: &str = r#"
        <html lang="en">
        <head><title>Bitcoin Wallet Guide</title></head>
        <body>
            <nav><a href="/">Home</a><a href="/blog">Blog</a></nav>
            <h1>Bitcoin Wallet Guide</h1>
            <p>This article is an introduction to storing bitcoin safely with a hardware wallet.</p>
            <h2>Seed phrase</h2>
            <p>Write the seed phrase on paper and keep a backup in a second location.</p>
            <p>Read the <a href="https://bitcoin.org/en/secure-your-wallet">official guide</a>
               and our <a href="/security">security checklist</a>.</p>
            <h2>Conclusion</h2>
            <p>In summary, cold storage protects your private key.</p>
            <footer>Copyright 2024</footer>
        </body>
        </html>
    "#;

    #[test]
    fn test_analyze_html_pipeline() {
        let analyzer = Analyzer::new();
        let report = analyzer.analyze_html(GUIDE, Some("https://example.com/wallets")).unwrap();

        assert_eq!(report.url, "https://example.com/wallets");
        assert_eq!(report.title.as_deref(), Some("Bitcoin Wallet Guide"));
        assert_eq!(report.language.as_deref(), Some("en"));
        assert!(report.error.is_none());

        let structure = report.structure.as_ref().unwrap();
        assert_eq!(structure.h1_count, 1);
        assert_eq!(structure.h2_count, 2);
        assert_eq!(structure.internal_links, 1);
        assert_eq!(structure.external_links, 1);
        assert!(structure.has_introduction);
        assert!(structure.has_conclusion);

        assert!(report.key_topics.contains(&"Security".to_string()));
        assert_eq!(report.topic_coverage.len(), 8);
        assert!(report.keywords.contains(&"wallet".to_string()));
        assert!(report.entities.contains(&"Bitcoin".to_string()));

        assert_eq!(report.semantic_gaps[0].rule, GapRule::WordCount);
        assert!(report.warning.is_none());
    }

    #[test]
    fn test_boilerplate_is_not_counted() {
        let report = analyze(GUIDE).unwrap();
        let structure = report.structure.unwrap();

        // nav links and footer text are stripped before analysis
        assert_eq!(structure.link_count, 2);
        assert!(!report.content_summary.unwrap().contains("Copyright"));
    }

    #[test]
    fn test_scores_rounded_and_bounded() {
        let report = analyze(GUIDE).unwrap();
        let scores = report.scores;

        for value in [
            scores.topic_relevance_score,
            scores.content_quality_score,
            scores.seo_score,
            scores.readability_score,
        ] {
            assert!((0.0..=1.0).contains(&value));
            assert_eq!(value, (value * 1000.0).round() / 1000.0);
        }
        assert_eq!(scores.topic_relevance_score, report.key_topics.len() as f64 / 8.0);
    }

    #[test]
    fn test_blank_input_is_no_content() {
        assert!(matches!(analyze("   \n"), Err(SemgapError::NoContent)));
    }

    #[test]
    fn test_invalid_url() {
        let result = analyze_with_url("<p>text</p>", "not a url");
        assert!(matches!(result, Err(SemgapError::InvalidUrl(_))));
    }

    #[test]
    fn test_options_disable_sections() {
        let config = AnalyzerConfig::builder()
            .perform_gap_analysis(false)
            .extract_entities(false)
            .extract_keywords(false)
            .extract_tags(false)
            .build();
        let report = Analyzer::with_config(config).analyze_html(GUIDE, None).unwrap();

        assert!(report.semantic_gaps.is_empty());
        assert!(report.content_gaps.is_empty());
        assert!(report.warning.is_none());
        assert!(report.entities.is_empty());
        assert!(report.missing_entities.is_empty());
        assert!(report.keywords.is_empty());
        assert!(report.keyword_density.is_empty());
        assert!(report.semantic_clusters.is_empty());
        assert!(report.tags.is_empty());
        assert!(!report.key_topics.is_empty());
    }

    #[test]
    fn test_max_content_length_limits_lexical_stage() {
        let full = Analyzer::new().analyze_html(GUIDE, None).unwrap();
        let config = AnalyzerConfig::builder().max_content_length(20).build();
        let capped = Analyzer::with_config(config).analyze_html(GUIDE, None).unwrap();

        // "Bitcoin Wallet Guide" is all the extractor sees
        assert_eq!(capped.keywords, vec!["bitcoin", "wallet", "guide"]);
        assert!(capped.keyword_density.keys().all(|kw| ["bitcoin", "wallet", "guide"].contains(&kw.as_str())));
        assert_eq!(capped.word_count, full.word_count);
        assert_eq!(capped.structure, full.structure);
        assert_eq!(capped.topic_coverage, full.topic_coverage);
        let rules = |report: &Report| report.semantic_gaps.iter().map(|g| (g.rule, g.severity)).collect::<Vec<_>>();
        assert_eq!(rules(&capped), rules(&full));
    }

    #[test]
    fn test_conclusion_past_content_cap_still_counts() {
        let body = "An introduction to wallets and keys. ".repeat(1500);
        let html = format!(
            "<h1>Wallets</h1><p>{}</p><h2>Conclusion</h2><p>In conclusion, back up your seed.</p>",
            body
        );
        let report = Analyzer::new().analyze_html(&html, None).unwrap();

        assert!(html.len() > AnalysisOptions::default().max_content_length);
        assert!(report.structure.as_ref().unwrap().has_conclusion);
        assert_eq!(report.word_count, 1500 * 6 + 8);
        assert!(report.semantic_gaps.iter().all(|gap| gap.rule != GapRule::MissingConclusion));
    }

    #[test]
    fn test_taxonomy_and_config_together() {
        let mining = Topic::new("Mining", &["hashrate", "asic"], &[], Importance::Critical, 100);
        let config = AnalyzerConfig::builder().perform_gap_analysis(false).max_content_length(5).build();
        let analyzer = Analyzer::with_taxonomy_and_config(Taxonomy::new(vec![mining]).unwrap(), config);

        assert_eq!(analyzer.taxonomy().len(), 1);
        assert_eq!(analyzer.config().options.max_content_length, 5);

        let report = analyzer.analyze_html("<p>ASIC hashrate climbs.</p>", None).unwrap();
        assert_eq!(report.key_topics, vec!["Mining"]);
        assert!(report.semantic_gaps.is_empty());
        assert_eq!(report.scores.topic_relevance_score, 1.0);
    }

    #[test]
    fn test_warning_when_no_gaps() {
        let topic = Topic::new("Gardening", &["soil"], &[], Importance::Medium, 10);
        let thresholds = GapThresholds { critical_word_count: 0, expansion_word_count: 0, ..Default::default() };
        let config = AnalyzerConfig::builder().thresholds(thresholds).build();
        let analyzer = Analyzer::with_taxonomy_and_config(Taxonomy::new(vec![topic]).unwrap(), config);

        let html = "<h1>Soil</h1><p>An introduction to soil. In conclusion, water it.</p>";
        let report = analyzer.analyze_html(html, None).unwrap();

        assert!(report.semantic_gaps.is_empty());
        assert_eq!(report.warning.as_deref(), Some(NO_GAPS_WARNING));
        assert_eq!(report.tags, vec!["Gardening"]);
    }

    #[test]
    fn test_evaluate_text_sample() {
        let gaps = Analyzer::new().evaluate_text(SAMPLE_TEXT);
        let rules: Vec<(GapRule, Option<&str>)> = gaps.iter().map(|g| (g.rule, g.topic())).collect();

        assert_eq!(
            rules,
            vec![
                (GapRule::WordCount, None),
                (GapRule::MissingH1, None),
                (GapRule::MissingTopic, Some("Security")),
                (GapRule::MissingTopic, Some("Trading")),
                (GapRule::MissingTopic, Some("DeFi")),
                (GapRule::MissingTopic, Some("Regulation")),
                (GapRule::MissingTopic, Some("Technology")),
                (GapRule::ShallowTopic, Some("Fundamentals")),
            ]
        );
        assert_eq!(gaps[0].severity, Severity::High);
        assert!(gaps.iter().all(|g| g.rule != GapRule::MissingIntroduction));
        assert!(gaps.iter().all(|g| g.rule != GapRule::MissingConclusion));
    }

    #[test]
    fn test_evaluate_text_with_keywords() {
        let keywords: Vec<String> =
            ["bitcoin", "blockchain", "ethereum", "cryptocurrency"].iter().map(|s| s.to_string()).collect();
        let gaps = Analyzer::new().evaluate_text_with(SAMPLE_TEXT, &keywords);

        assert_eq!(gaps[0].rule, GapRule::WordCount);
        assert_eq!(gaps[0].recommended_keywords, keywords);
        assert_eq!(gaps.len(), 8);
    }

    #[test]
    fn test_per_call_options() {
        let analyzer = Analyzer::new();
        let options = AnalysisOptions { perform_gap_analysis: false, ..Default::default() };
        let report = analyzer.analyze_html_with_options(GUIDE, None, &options).unwrap();

        assert!(report.semantic_gaps.is_empty());
        assert!(analyzer.config().options.perform_gap_analysis);
    }

    #[test]
    fn test_evaluate_text_is_deterministic() {
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.evaluate_text(SAMPLE_TEXT), analyzer.evaluate_text(SAMPLE_TEXT));
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();

        let analyzer = std::sync::Arc::new(Analyzer::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let analyzer = analyzer.clone();
                std::thread::spawn(move || analyzer.analyze_html(GUIDE, None).unwrap().semantic_gaps)
            })
            .collect();

        let results: Vec<Vec<Gap>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 0), "abc");
        assert_eq!(truncate_chars("abc", 5), "abc");
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_crawl_invalid_url_is_error_report() {
        let report = std::thread::spawn(|| {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { Analyzer::new().crawl("not-a-url", &FetchConfig::default()).await })
        })
        .join()
        .unwrap();

        assert_eq!(report.url, "not-a-url");
        assert!(report.error.as_deref().unwrap().starts_with("Analysis failed:"));
        assert!(report.structure.is_none());
    }
}
