use serde::Serialize;

use crate::coverage::TopicsFound;
use crate::lexicon::{lowercase_words, sentence_count, word_count};
use crate::structure::DocumentFeatures;

/// One step of a tiered contribution: `score` applies when the value is at
/// least `min`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub min: f64,
    pub score: f64,
}

impl Tier {
    pub const fn new(min: f64, score: f64) -> Self {
        Self { min, score }
    }
}

/// Score of the first tier whose minimum `value` reaches, 0 if none does
///
/// Tiers are expected in descending order of `min`.
pub fn tiered(value: f64, tiers: &[Tier]) -> f64 {
    tiers.iter().find(|tier| value >= tier.min).map_or(0.0, |tier| tier.score)
}

/// Weights and tiers of every composite score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreConfig {
    /// Structure contribution of a detected introduction (default: 0.15)
    pub introduction_score: f64,
    /// Structure contribution of a detected conclusion (default: 0.15)
    pub conclusion_score: f64,
    /// Structure contribution by heading count
    pub heading_tiers: Vec<Tier>,
    /// Structure contribution by list count
    pub list_tiers: Vec<Tier>,
    /// Structure contribution by image count
    pub image_tiers: Vec<Tier>,
    /// Structure contribution by link count
    pub link_tiers: Vec<Tier>,
    /// Structure bonus for exactly one H1 (default: 0.10)
    pub single_h1_score: f64,

    /// Word count at which the word count score saturates (default: 1200)
    pub word_count_saturation: f64,
    pub relevance_weight: f64,
    pub structure_weight: f64,
    pub word_count_weight: f64,

    /// Ranked keywords checked against the title (default: 15)
    pub title_keyword_limit: usize,
    /// Meta score when the title holds a top keyword (default: 0.25)
    pub title_keyword_score: f64,
    /// Meta score otherwise (default: 0.10)
    pub title_plain_score: f64,
    pub seo_heading_tiers: Vec<Tier>,
    pub seo_content_tiers: Vec<Tier>,
    pub seo_link_tiers: Vec<Tier>,
    pub seo_media_tiers: Vec<Tier>,

    pub ideal_word_length: f64,
    pub word_length_tolerance: f64,
    pub ideal_sentence_length: f64,
    pub sentence_length_tolerance: f64,
    pub word_length_weight: f64,
    pub sentence_length_weight: f64,
    /// Readability when the text has no words (default: 0.5)
    pub default_readability: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            introduction_score: 0.15,
            conclusion_score: 0.15,
            heading_tiers: vec![Tier::new(5.0, 0.20), Tier::new(3.0, 0.10)],
            list_tiers: vec![Tier::new(2.0, 0.15), Tier::new(1.0, 0.05)],
            image_tiers: vec![Tier::new(2.0, 0.15), Tier::new(1.0, 0.05)],
            link_tiers: vec![Tier::new(5.0, 0.10), Tier::new(2.0, 0.05)],
            single_h1_score: 0.10,
            word_count_saturation: 1200.0,
            relevance_weight: 0.35,
            structure_weight: 0.35,
            word_count_weight: 0.30,
            title_keyword_limit: 15,
            title_keyword_score: 0.25,
            title_plain_score: 0.10,
            seo_heading_tiers: vec![Tier::new(5.0, 0.20), Tier::new(3.0, 0.10)],
            seo_content_tiers: vec![Tier::new(800.0, 0.25), Tier::new(500.0, 0.15), Tier::new(0.0, 0.05)],
            seo_link_tiers: vec![Tier::new(5.0, 0.15), Tier::new(2.0, 0.08)],
            seo_media_tiers: vec![Tier::new(2.0, 0.15), Tier::new(1.0, 0.08)],
            ideal_word_length: 5.5,
            word_length_tolerance: 5.0,
            ideal_sentence_length: 17.0,
            sentence_length_tolerance: 20.0,
            word_length_weight: 0.6,
            sentence_length_weight: 0.4,
            default_readability: 0.5,
        }
    }
}

/// Word and sentence statistics used by the readability score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProfile {
    /// Whitespace-separated words
    pub word_count: usize,
    /// Lowercase alphabetic words of three or more letters
    pub lexical_words: Vec<String>,
    pub sentence_count: usize,
}

impl TextProfile {
    pub fn from_text(text: &str) -> Self {
        Self { word_count: word_count(text), lexical_words: lowercase_words(text), sentence_count: sentence_count(text) }
    }
}

/// The four composite scores, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Scores {
    pub topic_relevance_score: f64,
    pub content_quality_score: f64,
    pub seo_score: f64,
    pub readability_score: f64,
}

impl Scores {
    /// Scores rounded to three decimals for output
    pub fn rounded(&self) -> Self {
        Self {
            topic_relevance_score: round_to(self.topic_relevance_score, 3),
            content_quality_score: round_to(self.content_quality_score, 3),
            seo_score: round_to(self.seo_score, 3),
            readability_score: round_to(self.readability_score, 3),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Everything the aggregator looks at for one document
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub features: &'a DocumentFeatures,
    pub topics_found: &'a TopicsFound,
    pub taxonomy_size: usize,
    pub word_count: usize,
    pub title: &'a str,
    pub keywords: &'a [String],
    pub profile: &'a TextProfile,
}

/// Combines features, coverage and word count into [`Scores`]
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    config: ScoreConfig,
}

impl ScoreAggregator {
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    pub fn score(&self, inputs: &ScoreInputs<'_>) -> Scores {
        let topic_relevance_score = self.topic_relevance(inputs.topics_found, inputs.taxonomy_size);
        let structure = self.structure_score(inputs.features);

        Scores {
            topic_relevance_score,
            content_quality_score: self.content_quality(topic_relevance_score, structure, inputs.word_count),
            seo_score: self.seo(inputs.features, inputs.word_count, inputs.title, inputs.keywords),
            readability_score: self.readability(inputs.profile),
        }
    }

    /// Share of taxonomy topics with non-zero coverage
    pub fn topic_relevance(&self, topics_found: &TopicsFound, taxonomy_size: usize) -> f64 {
        if taxonomy_size == 0 {
            return 0.0;
        }
        clamp_unit(topics_found.len() as f64 / taxonomy_size as f64)
    }

    /// Sum of tiered layout contributions, capped at 1.0
    pub fn structure_score(&self, features: &DocumentFeatures) -> f64 {
        let c = &self.config;
        let mut score = 0.0;

        if features.has_introduction {
            score += c.introduction_score;
        }
        if features.has_conclusion {
            score += c.conclusion_score;
        }
        score += tiered(features.heading_count as f64, &c.heading_tiers);
        score += tiered(features.list_count as f64, &c.list_tiers);
        score += tiered(features.image_count as f64, &c.image_tiers);
        score += tiered(features.link_count as f64, &c.link_tiers);
        if features.h1_count == 1 {
            score += c.single_h1_score;
        }

        clamp_unit(score)
    }

    pub fn content_quality(&self, topic_relevance: f64, structure: f64, word_count: usize) -> f64 {
        let c = &self.config;
        let word_count_score = (word_count as f64 / c.word_count_saturation).min(1.0);

        clamp_unit(
            topic_relevance * c.relevance_weight
                + structure * c.structure_weight
                + word_count_score * c.word_count_weight,
        )
    }

    pub fn seo(&self, features: &DocumentFeatures, word_count: usize, title: &str, keywords: &[String]) -> f64 {
        let c = &self.config;
        let title = title.to_lowercase();

        let title_has_keyword = keywords.iter().take(c.title_keyword_limit).any(|kw| title.contains(kw.as_str()));
        let meta = if title_has_keyword { c.title_keyword_score } else { c.title_plain_score };

        clamp_unit(
            meta + tiered(features.heading_count as f64, &c.seo_heading_tiers)
                + tiered(word_count as f64, &c.seo_content_tiers)
                + tiered(features.link_count as f64, &c.seo_link_tiers)
                + tiered(features.image_count as f64, &c.seo_media_tiers),
        )
    }

    /// Closeness of average word and sentence length to their ideals
    pub fn readability(&self, profile: &TextProfile) -> f64 {
        let c = &self.config;
        if profile.lexical_words.is_empty() {
            return c.default_readability;
        }

        let letters: usize = profile.lexical_words.iter().map(|w| w.chars().count()).sum();
        let avg_word_length = letters as f64 / profile.lexical_words.len() as f64;
        let avg_sentence_length = profile.word_count as f64 / profile.sentence_count.max(1) as f64;

        let word_length_score =
            (1.0 - (avg_word_length - c.ideal_word_length).abs() / c.word_length_tolerance).max(0.0);
        let sentence_length_score =
            (1.0 - (avg_sentence_length - c.ideal_sentence_length).abs() / c.sentence_length_tolerance).max(0.0);

        clamp_unit(word_length_score * c.word_length_weight + sentence_length_score * c.sentence_length_weight)
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rich_features() -> DocumentFeatures {
        DocumentFeatures {
            h1_count: 1,
            h2_count: 5,
            heading_count: 6,
            has_introduction: true,
            has_conclusion: true,
            list_count: 3,
            image_count: 2,
            link_count: 6,
            internal_links: 4,
            external_links: 2,
            ..Default::default()
        }
    }

    fn all_topics() -> TopicsFound {
        ["Fundamentals", "Trading", "DeFi", "Security", "NFTs", "Regulation", "Technology", "Economics"]
            .into_iter()
            .map(|name| (name, 1.0))
            .collect()
    }

    #[test]
    fn test_tiered() {
        let tiers = [Tier::new(5.0, 0.2), Tier::new(3.0, 0.1)];
        assert_eq!(tiered(7.0, &tiers), 0.2);
        assert_eq!(tiered(5.0, &tiers), 0.2);
        assert_eq!(tiered(4.0, &tiers), 0.1);
        assert_eq!(tiered(2.0, &tiers), 0.0);
        assert_eq!(tiered(1.0, &[]), 0.0);
    }

    #[test]
    fn test_topic_relevance_is_exact_ratio() {
        let aggregator = ScoreAggregator::default();
        let found: TopicsFound = vec![("Fundamentals", 0.3), ("Security", 0.1), ("DeFi", 0.5)].into_iter().collect();

        assert_eq!(aggregator.topic_relevance(&found, 8), 3.0 / 8.0);
        assert_eq!(aggregator.topic_relevance(&TopicsFound::new(), 8), 0.0);
        assert_eq!(aggregator.topic_relevance(&found, 0), 0.0);
    }

    #[test]
    fn test_structure_score_full() {
        let aggregator = ScoreAggregator::default();
        assert!((aggregator.structure_score(&rich_features()) - 1.0).abs() < 1e-9);
        assert_eq!(aggregator.structure_score(&DocumentFeatures::default()), 0.0);
    }

    #[test]
    fn test_well_structured_document_quality() {
        let aggregator = ScoreAggregator::default();
        let features = rich_features();
        let topics = all_topics();
        let profile = TextProfile::default();
        let inputs = ScoreInputs {
            features: &features,
            topics_found: &topics,
            taxonomy_size: 8,
            word_count: 1000,
            title: "",
            keywords: &[],
            profile: &profile,
        };

        let scores = aggregator.score(&inputs);
        assert_eq!(scores.topic_relevance_score, 1.0);
        assert!(scores.content_quality_score >= 0.9);
        assert!((scores.content_quality_score - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_seo_components() {
        let aggregator = ScoreAggregator::default();
        let keywords = vec!["wallet".to_string()];

        let with_keyword = aggregator.seo(&rich_features(), 900, "Hardware Wallet Guide", &keywords);
        assert!((with_keyword - (0.25 + 0.20 + 0.25 + 0.15 + 0.15)).abs() < 1e-9);

        let bare = aggregator.seo(&DocumentFeatures::default(), 10, "Untitled Page", &keywords);
        assert!((bare - (0.10 + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn test_seo_title_keyword_limit() {
        let aggregator = ScoreAggregator::default();
        let mut keywords: Vec<String> = (0..15).map(|i| format!("zz{}", i)).collect();
        keywords.push("wallet".to_string());

        let score = aggregator.seo(&DocumentFeatures::default(), 0, "wallet", &keywords);
        assert!((score - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_readability_default_without_words() {
        let aggregator = ScoreAggregator::default();
        assert_eq!(aggregator.readability(&TextProfile::from_text("")), 0.5);
        assert_eq!(aggregator.readability(&TextProfile::from_text("42 7 ok")), 0.5);
    }

    #[test]
    fn test_readability_ideal_text() {
        let aggregator = ScoreAggregator::default();
        // 17 words of 5-6 letters in one sentence
        let sentence = "alpha bravo charlie delta eagle forest garden hunter island jungle karate lemons mango nectar orange pepper quartz.";
        let profile = TextProfile::from_text(sentence);

        assert_eq!(profile.word_count, 17);
        assert_eq!(profile.sentence_count, 1);
        assert!(aggregator.readability(&profile) > 0.9);
    }

    #[rstest]
    #[case(0, 0, 0, 0, 0, false, false)]
    #[case(1, 1, 1, 1, 1, true, false)]
    #[case(1, 2, 2, 2, 2, false, true)]
    #[case(2, 3, 3, 3, 3, true, true)]
    #[case(1, 4, 4, 5, 5, true, true)]
    #[case(3, 5, 50, 50, 50, true, true)]
    fn test_scores_stay_in_unit_interval(
        #[case] h1_count: usize, #[case] heading_count: usize, #[case] list_count: usize, #[case] image_count: usize,
        #[case] link_count: usize, #[case] has_introduction: bool, #[case] has_conclusion: bool,
    ) {
        let aggregator = ScoreAggregator::default();
        let features = DocumentFeatures {
            h1_count,
            heading_count,
            list_count,
            image_count,
            link_count,
            has_introduction,
            has_conclusion,
            ..Default::default()
        };
        let keywords = vec!["bitcoin".to_string()];

        for word_count in [0, 299, 500, 800, 1200, 100_000] {
            for topics in [TopicsFound::new(), all_topics()] {
                for text in ["", "Bitcoin.", "a b c d e f g h i j k l m n o p q r s t u v w x y z"] {
                    let profile = TextProfile::from_text(text);
                    let inputs = ScoreInputs {
                        features: &features,
                        topics_found: &topics,
                        taxonomy_size: 8,
                        word_count,
                        title: "Bitcoin basics",
                        keywords: &keywords,
                        profile: &profile,
                    };
                    let scores = aggregator.score(&inputs);
                    for value in [
                        scores.topic_relevance_score,
                        scores.content_quality_score,
                        scores.seo_score,
                        scores.readability_score,
                    ] {
                        assert!((0.0..=1.0).contains(&value), "{:?}", scores);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rounded() {
        let scores = Scores {
            topic_relevance_score: 0.123456,
            content_quality_score: 0.9996,
            seo_score: 0.5,
            readability_score: 0.0004,
        };
        let rounded = scores.rounded();
        assert_eq!(rounded.topic_relevance_score, 0.123);
        assert_eq!(rounded.content_quality_score, 1.0);
        assert_eq!(rounded.seo_score, 0.5);
        assert_eq!(rounded.readability_score, 0.0);
    }
}
