pub mod analyzer;
pub mod coverage;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod gaps;
pub mod insights;
pub mod lexicon;
pub mod metadata;
pub mod parse;
pub mod preprocess;
pub mod report;
pub mod scoring;
pub mod structure;
pub mod taxonomy;

pub use analyzer::{
    AnalysisOptions, Analyzer, AnalyzerConfig, AnalyzerConfigBuilder, SemgapConfig, SemgapConfigBuilder, analyze,
    analyze_with_url,
};
#[cfg(feature = "fetch")]
pub use analyzer::fetch_and_analyze;
pub use coverage::{CoverageReport, TaxonomyCoverageAnalyzer, TopicCoverage, TopicsFound};
pub use error::{Result, SemgapError};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_url, parse_http_url};
pub use fetch::{FetchConfig, fetch_file, fetch_stdin};
pub use formatters::{JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_json, convert_to_markdown, convert_to_text};
pub use gaps::{Gap, GapInputs, GapRule, GapRuleEngine, GapThresholds, GapType, Severity};
pub use lexicon::{FrequencyExtractor, LexicalExtractor, Lexicon};
pub use metadata::PageMetadata;
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
pub use report::{OutputFormat, Report};
pub use scoring::{ScoreAggregator, ScoreConfig, ScoreInputs, Scores, TextProfile, Tier};
pub use structure::{DocumentFeatures, StructureExtractor};
pub use taxonomy::{Importance, Taxonomy, TaxonomyLoader, Topic};
