//! Heuristic gap detection.
//!
//! [`GapRuleEngine`] evaluates a fixed, ordered rule set over the features of
//! one document and returns every content deficiency it finds as a [`Gap`].
//! Rule families run in this order, each independently:
//!
//! 1. word count
//! 2. structure (H1, headings, introduction, conclusion)
//! 3. per-topic coverage, in taxonomy order
//! 4. visual elements (images, lists, tables)
//! 5. linking
//! 6. paragraph length
//!
//! The accumulated list is then stably sorted by [`Severity`], so gaps of the
//! same severity keep rule-evaluation order. Every numeric threshold lives in
//! [`GapThresholds`].

use std::fmt;

use serde::Serialize;

use crate::coverage::{CoverageReport, TopicCoverage};
use crate::structure::DocumentFeatures;
use crate::taxonomy::{Importance, Taxonomy, Topic};

/// Category of a detected gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    ShallowCoverage,
    Structural,
    MissingTopic,
    MissingSubtopic,
}

/// Priority tier of a gap. Ordering follows [`Severity::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank: high = 0, medium = 1, low = 2
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the rule that produced a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GapRule {
    WordCount,
    MissingH1,
    MultipleH1,
    InsufficientHeadings,
    MissingIntroduction,
    MissingConclusion,
    MissingTopic,
    SparseTopic,
    ShallowTopic,
    NoImages,
    NoLists,
    NoTables,
    InternalLinks,
    ExternalLinks,
    LongParagraphs,
}

/// A single detected content deficiency with remediation guidance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub gap_type: GapType,
    pub description: String,
    pub severity: Severity,
    pub affected_topics: Vec<String>,
    pub solution: String,
    pub recommended_keywords: Vec<String>,
    pub content_suggestions: Vec<String>,
    #[serde(skip)]
    pub rule: GapRule,
}

impl Gap {
    fn new(rule: GapRule, gap_type: GapType, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            gap_type,
            description: description.into(),
            severity,
            affected_topics: Vec::new(),
            solution: String::new(),
            recommended_keywords: Vec::new(),
            content_suggestions: Vec::new(),
            rule,
        }
    }

    fn affecting<S: AsRef<str>>(mut self, topics: &[S]) -> Self {
        self.affected_topics = topics.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    fn solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = solution.into();
        self
    }

    fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommended_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    fn suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    /// Name of the topic for per-topic gaps
    pub fn topic(&self) -> Option<&str> {
        match self.rule {
            GapRule::MissingTopic | GapRule::SparseTopic | GapRule::ShallowTopic => {
                self.affected_topics.first().map(String::as_str)
            }
            _ => None,
        }
    }
}

/// Thresholds, targets and list limits of every gap rule
#[derive(Debug, Clone, PartialEq)]
pub struct GapThresholds {
    /// Below this word count content is critically short (default: 300)
    pub critical_word_count: usize,
    /// Below this word count content needs expansion (default: 600)
    pub expansion_word_count: usize,
    /// Word target for critically short content (default: 800)
    pub critical_word_target: usize,
    /// Word target for content that needs expansion (default: 1000)
    pub expansion_word_target: usize,
    /// Ranked keywords recommended for critically short content (default: 10)
    pub critical_keyword_limit: usize,
    /// Ranked keywords recommended for content that needs expansion (default: 8)
    pub expansion_keyword_limit: usize,

    /// Minimum heading count for longer content (default: 3)
    pub min_headings: usize,
    /// Word count above which the heading rule applies (default: 400)
    pub headings_word_count: usize,
    /// Heading count the remediation aims for (default: 5)
    pub target_headings: usize,
    /// Smallest number of headings ever suggested (default: 3)
    pub min_suggested_headings: usize,

    /// Upper bound of the sparse coverage tier (default: 0.25)
    pub sparse_coverage: f64,
    /// Upper bound of the shallow coverage tier (default: 0.5)
    pub shallow_coverage: f64,
    /// Topic keywords recommended for a missing topic (default: 6)
    pub missing_topic_keywords: usize,
    /// Subtopics suggested for a missing topic (default: 3)
    pub missing_topic_suggestions: usize,
    /// Missing keywords recommended for a sparse topic (default: 5)
    pub sparse_topic_keywords: usize,
    /// Subtopics suggested for a sparse topic (default: 2)
    pub sparse_topic_suggestions: usize,
    /// Missing keywords recommended for a shallow topic (default: 4)
    pub shallow_topic_keywords: usize,

    /// Word count above which missing images are reported (default: 400)
    pub images_word_count: usize,
    /// Word count above which missing lists are reported (default: 400)
    pub lists_word_count: usize,
    /// Word count above which missing tables are reported (default: 600)
    pub tables_word_count: usize,

    /// Minimum internal links for longer content (default: 2)
    pub min_internal_links: usize,
    /// Word count above which the linking rules apply (default: 500)
    pub links_word_count: usize,

    /// Mean paragraph length considered too long (default: 150.0)
    pub long_paragraph_words: f64,
    /// Paragraph count above which paragraph length matters (default: 3)
    pub long_paragraph_count: usize,

    /// Upper bound on `recommended_keywords` of any gap (default: 10)
    pub max_recommended_keywords: usize,
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self {
            critical_word_count: 300,
            expansion_word_count: 600,
            critical_word_target: 800,
            expansion_word_target: 1000,
            critical_keyword_limit: 10,
            expansion_keyword_limit: 8,
            min_headings: 3,
            headings_word_count: 400,
            target_headings: 5,
            min_suggested_headings: 3,
            sparse_coverage: 0.25,
            shallow_coverage: 0.5,
            missing_topic_keywords: 6,
            missing_topic_suggestions: 3,
            sparse_topic_keywords: 5,
            sparse_topic_suggestions: 2,
            shallow_topic_keywords: 4,
            images_word_count: 400,
            lists_word_count: 400,
            tables_word_count: 600,
            min_internal_links: 2,
            links_word_count: 500,
            long_paragraph_words: 150.0,
            long_paragraph_count: 3,
            max_recommended_keywords: 10,
        }
    }
}

/// Everything the rule set looks at for one document
#[derive(Debug, Clone, Copy)]
pub struct GapInputs<'a> {
    pub features: &'a DocumentFeatures,
    pub coverage: &'a CoverageReport,
    pub word_count: usize,
    /// Ranked keywords, most important first
    pub keywords: &'a [String],
}

/// Evaluates the gap rule set
#[derive(Debug, Clone, Default)]
pub struct GapRuleEngine {
    thresholds: GapThresholds,
}

impl GapRuleEngine {
    pub fn new(thresholds: GapThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &GapThresholds {
        &self.thresholds
    }

    /// Run every rule and return the gaps sorted by severity.
    ///
    /// Deterministic: equal inputs always produce an identical list.
    pub fn evaluate(&self, taxonomy: &Taxonomy, inputs: &GapInputs<'_>) -> Vec<Gap> {
        tracing::debug!(
            word_count = inputs.word_count,
            topics_found = inputs.coverage.topics_found().len(),
            keywords = inputs.keywords.len(),
            "Starting gap analysis"
        );

        let mut gaps = Vec::new();

        tracing::debug!("Checking word count");
        self.word_count_rules(inputs, &mut gaps);

        tracing::debug!("Checking structural elements");
        self.structural_rules(inputs, &mut gaps);

        tracing::debug!("Checking topic coverage");
        for topic in taxonomy {
            match inputs.coverage.get(&topic.name) {
                Some(coverage) => self.topic_rules(topic, coverage, &mut gaps),
                None => tracing::warn!(topic = %topic.name, "No coverage computed for topic"),
            }
        }

        tracing::debug!("Checking visual elements");
        self.visual_rules(inputs, &mut gaps);

        tracing::debug!("Checking linking strategy");
        self.linking_rules(inputs, &mut gaps);

        tracing::debug!("Checking paragraph structure");
        self.paragraph_rules(inputs, &mut gaps);

        let limit = self.thresholds.max_recommended_keywords;
        for gap in &mut gaps {
            gap.recommended_keywords.truncate(limit);
        }

        // sort_by_key is stable: equal severities keep evaluation order
        gaps.sort_by_key(|gap| gap.severity.rank());

        let critical = gaps.iter().filter(|g| g.severity == Severity::High).count();
        let high = gaps.iter().filter(|g| g.severity == Severity::Medium).count();
        tracing::info!(critical, high, total = gaps.len(), "Gap analysis completed");

        gaps
    }

    fn word_count_rules(&self, inputs: &GapInputs<'_>, gaps: &mut Vec<Gap>) {
        let t = &self.thresholds;
        let words = inputs.word_count;

        if words < t.critical_word_count {
            tracing::debug!(words, "Word count critically short");
            gaps.push(
                Gap::new(
                    GapRule::WordCount,
                    GapType::ShallowCoverage,
                    Severity::High,
                    format!(
                        "Content is critically short ({} words). Minimum 800-1000 words recommended for comprehensive coverage.",
                        words
                    ),
                )
                .affecting(&["Content Depth"])
                .solution(format!(
                    "Expand content by adding {} words. Focus on explaining concepts in detail with examples.",
                    t.critical_word_target.saturating_sub(words)
                ))
                .keywords(inputs.keywords.iter().take(t.critical_keyword_limit).cloned())
                .suggestions([
                    "Add detailed explanations for each main concept",
                    "Include real-world examples and use cases",
                    "Provide step-by-step guides or tutorials",
                    "Add comparison tables or feature lists",
                ]),
            );
        } else if words < t.expansion_word_count {
            tracing::debug!(words, "Word count needs expansion");
            gaps.push(
                Gap::new(
                    GapRule::WordCount,
                    GapType::ShallowCoverage,
                    Severity::Medium,
                    format!("Content needs expansion ({} words). Aim for 1000-1500 words for better depth.", words),
                )
                .affecting(&["Content Depth"])
                .solution(format!(
                    "Add {} more words of valuable, relevant information.",
                    t.expansion_word_target.saturating_sub(words)
                ))
                .keywords(inputs.keywords.iter().take(t.expansion_keyword_limit).cloned())
                .suggestions([
                    "Elaborate on key points with more detail",
                    "Add supporting data and statistics",
                    "Include expert quotes or insights",
                ]),
            );
        }
    }

    fn structural_rules(&self, inputs: &GapInputs<'_>, gaps: &mut Vec<Gap>) {
        let t = &self.thresholds;
        let features = inputs.features;

        if features.h1_count == 0 {
            tracing::debug!("Missing H1 heading");
            gaps.push(
                Gap::new(
                    GapRule::MissingH1,
                    GapType::Structural,
                    Severity::High,
                    "Missing H1 heading - critical for SEO and content hierarchy",
                )
                .affecting(&["SEO", "Content Structure"])
                .solution("Add a clear, keyword-rich H1 heading at the top of your content")
                .suggestions(["H1 should summarize the main topic and include primary keyword"]),
            );
        }

        if features.h1_count > 1 {
            tracing::debug!(h1_count = features.h1_count, "Multiple H1 tags found");
            gaps.push(
                Gap::new(
                    GapRule::MultipleH1,
                    GapType::Structural,
                    Severity::Medium,
                    format!(
                        "Multiple H1 tags found ({}). Only one H1 per page is recommended.",
                        features.h1_count
                    ),
                )
                .affecting(&["SEO", "Content Structure"])
                .solution("Use only one H1 for the main title, convert others to H2 or H3")
                .suggestions(["Main title = H1, Main sections = H2, Subsections = H3"]),
            );
        }

        if features.heading_count < t.min_headings && inputs.word_count > t.headings_word_count {
            tracing::debug!(heading_count = features.heading_count, "Insufficient headings");
            let to_add = t.target_headings.saturating_sub(features.heading_count).max(t.min_suggested_headings);
            gaps.push(
                Gap::new(
                    GapRule::InsufficientHeadings,
                    GapType::Structural,
                    Severity::High,
                    format!(
                        "Insufficient headings ({}) for {} words",
                        features.heading_count, inputs.word_count
                    ),
                )
                .affecting(&["Content Structure", "Readability"])
                .solution(format!(
                    "Add {} more section headings. Aim for one heading per 150-250 words.",
                    to_add
                ))
                .suggestions([
                    "Break long sections into subsections with H2/H3 tags",
                    "Use descriptive, keyword-rich headings",
                    "Create logical content hierarchy",
                ]),
            );
        }

        if !features.has_introduction {
            tracing::debug!("Missing introduction section");
            gaps.push(
                Gap::new(
                    GapRule::MissingIntroduction,
                    GapType::Structural,
                    Severity::High,
                    "No clear introduction section detected",
                )
                .affecting(&["Content Structure", "User Experience"])
                .solution("Add an introduction (100-200 words) that explains what readers will learn")
                .keywords(["introduction", "overview", "guide"])
                .suggestions([
                    "Start with a hook that captures attention",
                    "Outline what the article covers",
                    "Explain who the content is for",
                    "Set expectations for what readers will learn",
                ]),
            );
        }

        if !features.has_conclusion {
            tracing::debug!("Missing conclusion section");
            gaps.push(
                Gap::new(
                    GapRule::MissingConclusion,
                    GapType::Structural,
                    Severity::Medium,
                    "Missing conclusion or summary section",
                )
                .affecting(&["Content Structure", "User Experience"])
                .solution("Add a conclusion summarizing key points and providing next steps")
                .keywords(["conclusion", "summary", "takeaways"])
                .suggestions([
                    "Summarize 3-5 main points",
                    "Provide actionable next steps",
                    "Include a call-to-action (CTA)",
                    "Link to related resources",
                ]),
            );
        }
    }

    fn topic_rules(&self, topic: &Topic, coverage: &TopicCoverage, gaps: &mut Vec<Gap>) {
        let t = &self.thresholds;
        let ratio = coverage.coverage_ratio;
        let depth = coverage.estimated_word_count;

        tracing::debug!(topic = %topic.name, coverage = ratio, depth, "Analyzing topic");

        // keywords_found holds normalized taxonomy keywords, so membership
        // compares like with like
        let not_found = || topic.keywords.iter().filter(|kw| !coverage.keywords_found.contains(kw)).cloned();

        if ratio == 0.0 {
            if !topic.importance.is_required() {
                return;
            }
            tracing::debug!(topic = %topic.name, "Missing topic");
            let severity = if topic.importance == Importance::Critical { Severity::High } else { Severity::Medium };
            gaps.push(
                Gap::new(
                    GapRule::MissingTopic,
                    GapType::MissingTopic,
                    severity,
                    format!("Critical topic '{}' is completely absent", topic.name),
                )
                .affecting(&[&topic.name])
                .solution(format!(
                    "Add a dedicated section about {} ({}+ words)",
                    topic.name, topic.min_word_count
                ))
                .keywords(topic.keywords.iter().take(t.missing_topic_keywords).cloned())
                .suggestions(
                    topic
                        .subtopics
                        .iter()
                        .take(t.missing_topic_suggestions)
                        .map(|sub| format!("Explain {}", sub)),
                ),
            );
        } else if ratio < t.sparse_coverage {
            tracing::debug!(topic = %topic.name, "Sparse coverage for topic");
            gaps.push(
                Gap::new(
                    GapRule::SparseTopic,
                    GapType::ShallowCoverage,
                    Severity::Medium,
                    format!(
                        "Topic '{}' has minimal coverage ({}/{} concepts covered)",
                        topic.name,
                        coverage.keywords_found.len(),
                        topic.keywords.len()
                    ),
                )
                .affecting(&[&topic.name])
                .solution(format!(
                    "Expand {} section with deeper explanations. Current: ~{} words, Target: {}+ words",
                    topic.name, depth, topic.min_word_count
                ))
                .keywords(not_found().take(t.sparse_topic_keywords))
                .suggestions(
                    topic
                        .subtopics
                        .iter()
                        .take(t.sparse_topic_suggestions)
                        .map(|sub| format!("Add details about {}", sub)),
                ),
            );
        } else if ratio < t.shallow_coverage && depth < topic.min_word_count {
            tracing::debug!(topic = %topic.name, "Insufficient depth for topic");
            gaps.push(
                Gap::new(
                    GapRule::ShallowTopic,
                    GapType::ShallowCoverage,
                    Severity::Low,
                    format!(
                        "Topic '{}' lacks depth (only ~{} words, {}% keyword coverage)",
                        topic.name,
                        depth,
                        (ratio * 100.0) as u32
                    ),
                )
                .affecting(&[&topic.name])
                .solution(format!(
                    "Add {} more words explaining {} concepts in detail",
                    topic.min_word_count - depth,
                    topic.name
                ))
                .keywords(not_found().take(t.shallow_topic_keywords))
                .suggestions([
                    "Provide more detailed explanations",
                    "Add practical examples",
                    "Include common mistakes or FAQs",
                ]),
            );
        }
    }

    fn visual_rules(&self, inputs: &GapInputs<'_>, gaps: &mut Vec<Gap>) {
        let t = &self.thresholds;
        let features = inputs.features;
        let words = inputs.word_count;

        if features.image_count == 0 && words > t.images_word_count {
            tracing::debug!("No images found");
            gaps.push(
                Gap::new(GapRule::NoImages, GapType::MissingSubtopic, Severity::Medium, "No images or visual aids found")
                    .affecting(&["Visual Content", "Engagement"])
                    .solution("Add 2-5 relevant images, diagrams, or infographics")
                    .suggestions([
                        "Add diagrams for complex concepts",
                        "Include screenshots for tutorials",
                        "Use charts for data visualization",
                        "Add infographics for processes",
                    ]),
            );
        }

        if features.list_count == 0 && words > t.lists_word_count {
            tracing::debug!("No lists found");
            gaps.push(
                Gap::new(
                    GapRule::NoLists,
                    GapType::Structural,
                    Severity::Low,
                    "No lists or bullet points - reduces scannability",
                )
                .affecting(&["Readability", "UX"])
                .solution("Add 2-3 bulleted or numbered lists for better readability")
                .suggestions([
                    "Use bullets for feature lists",
                    "Create numbered lists for steps",
                    "Add quick tips or key points sections",
                ]),
            );
        }

        if features.table_count == 0 && words > t.tables_word_count {
            tracing::debug!("No tables found");
            gaps.push(
                Gap::new(GapRule::NoTables, GapType::MissingSubtopic, Severity::Low, "Consider adding comparison tables")
                    .affecting(&["Content Format", "Comparison"])
                    .solution("Add tables to compare features, prices, or options")
                    .suggestions([
                        "Create comparison tables",
                        "Add data tables for statistics",
                        "Use tables for technical specifications",
                    ]),
            );
        }
    }

    fn linking_rules(&self, inputs: &GapInputs<'_>, gaps: &mut Vec<Gap>) {
        let t = &self.thresholds;
        let features = inputs.features;

        if features.internal_links < t.min_internal_links && inputs.word_count > t.links_word_count {
            tracing::debug!(internal_links = features.internal_links, "Insufficient internal links");
            gaps.push(
                Gap::new(
                    GapRule::InternalLinks,
                    GapType::Structural,
                    Severity::Medium,
                    format!("Insufficient internal linking ({} links found)", features.internal_links),
                )
                .affecting(&["SEO", "Navigation"])
                .solution("Add 3-5 internal links to related content on your site")
                .suggestions([
                    "Link to related articles",
                    "Add contextual links for deeper topics",
                    "Link to your main pillar pages",
                ]),
            );
        }

        if features.external_links == 0 && inputs.word_count > t.links_word_count {
            tracing::debug!("No external links found");
            gaps.push(
                Gap::new(
                    GapRule::ExternalLinks,
                    GapType::Structural,
                    Severity::Low,
                    "No external references or sources cited",
                )
                .affecting(&["Credibility", "SEO"])
                .solution("Add 2-3 links to authoritative external sources")
                .suggestions([
                    "Link to research studies or data",
                    "Reference industry authorities",
                    "Cite official documentation",
                ]),
            );
        }
    }

    fn paragraph_rules(&self, inputs: &GapInputs<'_>, gaps: &mut Vec<Gap>) {
        let t = &self.thresholds;
        let features = inputs.features;

        if features.avg_paragraph_length > t.long_paragraph_words && features.paragraph_count > t.long_paragraph_count
        {
            tracing::debug!(avg = features.avg_paragraph_length, "Long paragraphs detected");
            gaps.push(
                Gap::new(
                    GapRule::LongParagraphs,
                    GapType::Structural,
                    Severity::Low,
                    format!(
                        "Paragraphs are too long (avg {} words)",
                        features.avg_paragraph_length as u64
                    ),
                )
                .affecting(&["Readability"])
                .solution("Break long paragraphs into shorter chunks (50-100 words each)")
                .suggestions([
                    "Aim for 2-4 sentences per paragraph",
                    "Use line breaks for better readability",
                    "Split complex ideas into separate paragraphs",
                ]),
            );
        }
    }
}
