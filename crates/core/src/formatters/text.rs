use crate::Result;
use crate::report::Report;

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Line width for wrapping (0 = no wrapping)
    pub line_width: usize,
    /// Include the title, URL and score header
    pub include_header: bool,
    /// Include remediation details under each gap
    pub include_solutions: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { line_width: 80, include_header: true, include_solutions: true }
    }
}

/// Plain text formatter with configurable options
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, report: &Report) -> Result<String> {
        convert_to_text(report, &self.config)
    }
}

/// Convert a report to a plain text summary
pub fn convert_to_text(report: &Report, config: &TextConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(report));
        output.push('\n');
    }

    if let Some(error) = &report.error {
        output.push_str(&wrap_text(&format!("Error: {}", error), config.line_width));
        output.push('\n');
        return Ok(output);
    }

    if let Some(warning) = &report.warning {
        output.push_str(&wrap_text(&format!("Warning: {}", warning), config.line_width));
        output.push_str("\n\n");
    }

    if report.semantic_gaps.is_empty() {
        output.push_str("No gaps detected.\n");
    } else {
        output.push_str(&format!("Gaps ({}):\n", report.semantic_gaps.len()));
        for (i, gap) in report.semantic_gaps.iter().enumerate() {
            let line = format!("{}. [{}] {}", i + 1, gap.severity.as_str().to_uppercase(), gap.description);
            output.push_str(&wrap_text(&line, config.line_width));
            output.push('\n');

            if config.include_solutions {
                let solution = wrap_text(&gap.solution, config.line_width.saturating_sub(3));
                for line in solution.lines() {
                    output.push_str(&format!("   {}\n", line));
                }
            }
        }
    }

    if !report.recommended_topics.is_empty() {
        output.push_str(&format!("\nRecommended topics: {}\n", report.recommended_topics.join(", ")));
    }

    Ok(output)
}

fn generate_header(report: &Report) -> String {
    let mut header = String::new();

    if let Some(title) = &report.title {
        header.push_str(&format!("Title: {}\n", title));
    }
    header.push_str(&format!("URL: {}\n", report.url));

    if report.error.is_none() {
        let scores = &report.scores;
        header.push_str(&format!("Words: {}\n", report.word_count));
        header.push_str(&format!(
            "Scores: relevance {:.3} | quality {:.3} | seo {:.3} | readability {:.3}\n",
            scores.topic_relevance_score, scores.content_quality_score, scores.seo_score, scores.readability_score
        ));
        if !report.tags.is_empty() {
            header.push_str(&format!("Tags: {}\n", report.tags.join(", ")));
        }
    }

    header
}

/// Wrap text to specified line width
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push_str(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_length += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaps::Severity;
    use crate::scoring::Scores;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three four", 9), "one two\nthree\nfour");
        assert_eq!(wrap_text("one two", 0), "one two");
        assert_eq!(wrap_text("", 10), "");
    }

    #[test]
    fn test_header_with_scores() {
        let report = Report {
            url: "https://example.com".to_string(),
            title: Some("Guide".to_string()),
            word_count: 42,
            scores: Scores { topic_relevance_score: 0.375, ..Default::default() },
            tags: vec!["Fundamentals".to_string()],
            ..Default::default()
        };
        let text = convert_to_text(&report, &TextConfig::default()).unwrap();

        assert!(text.starts_with("Title: Guide\nURL: https://example.com\nWords: 42\n"));
        assert!(text.contains("relevance 0.375"));
        assert!(text.contains("Tags: Fundamentals"));
        assert!(text.contains("No gaps detected."));
    }

    #[test]
    fn test_gaps_listed_with_solutions() {
        let report = crate::analyzer::analyze("<html><body><p>Bitcoin wallet basics.</p></body></html>").unwrap();
        let text = TextFormatter::new(TextConfig::default()).convert(&report).unwrap();

        assert!(text.contains("1. [HIGH] Content is critically short"));
        assert!(text.contains("   Expand content by adding"));
        assert_eq!(report.semantic_gaps[0].severity, Severity::High);
    }

    #[test]
    fn test_error_report() {
        let report = Report::failed("https://example.com", "Failed to fetch URL: timed out");
        let text = convert_to_text(&report, &TextConfig { include_header: false, ..Default::default() }).unwrap();
        assert_eq!(text, "Error: Failed to fetch URL: timed out\n");
    }
}
