use crate::Result;
use crate::gaps::Gap;
use crate::report::Report;

/// Configuration for Markdown conversion
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with scores
    pub include_frontmatter: bool,
    /// Include the gap overview table
    pub include_gap_table: bool,
    /// Include a remediation section per gap
    pub include_remediation: bool,
    /// Include tags, topics and keyword clusters
    pub include_insights: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_frontmatter: true, include_gap_table: true, include_remediation: true, include_insights: true }
    }
}

/// Convert a report to Markdown with optional frontmatter
pub fn convert_to_markdown(report: &Report, config: &MarkdownConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(report));
        output.push('\n');
    }

    let title = report.title.as_deref().unwrap_or("Content Analysis");
    output.push_str(&format!("# {}\n\n", title));

    if let Some(error) = &report.error {
        output.push_str(&format!("> **Error:** {}\n", error));
        return Ok(output);
    }

    if let Some(warning) = &report.warning {
        output.push_str(&format!("> {}\n\n", warning));
    }

    if let Some(summary) = &report.content_summary {
        output.push_str(&format!("{}\n\n", summary));
    }

    if config.include_gap_table && !report.semantic_gaps.is_empty() {
        output.push_str("## Gaps\n\n");
        output.push_str(&generate_gap_table(&report.semantic_gaps));
        output.push('\n');
    }

    if config.include_remediation && !report.semantic_gaps.is_empty() {
        output.push_str("## Remediation\n\n");
        for (i, gap) in report.semantic_gaps.iter().enumerate() {
            output.push_str(&generate_remediation(i + 1, gap));
        }
    }

    if config.include_insights {
        output.push_str(&generate_insights(report));
    }

    Ok(output.trim_end().to_string() + "\n")
}

/// Generate TOML frontmatter from report scores
fn generate_frontmatter(report: &Report) -> String {
    let mut frontmatter = String::from("+++");

    if let Some(title) = &report.title {
        frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(title)));
    }

    frontmatter.push_str(&format!("\nurl = {}", toml_escape_string(&report.url)));

    if let Some(description) = &report.description {
        frontmatter.push_str(&format!("\ndescription = {}", toml_escape_string(description)));
    }

    if let Some(language) = &report.language {
        frontmatter.push_str(&format!("\nlanguage = {}", toml_escape_string(language)));
    }

    if let Some(date) = report.crawled_at() {
        frontmatter.push_str(&format!("\ncrawled_at = {}", toml_escape_string(&date)));
    }

    if let Some(error) = &report.error {
        frontmatter.push_str(&format!("\nerror = {}", toml_escape_string(error)));
    } else {
        let scores = &report.scores;
        frontmatter.push_str(&format!("\nword_count = {}", report.word_count));
        frontmatter.push_str(&format!("\ntopic_relevance_score = {}", scores.topic_relevance_score));
        frontmatter.push_str(&format!("\ncontent_quality_score = {}", scores.content_quality_score));
        frontmatter.push_str(&format!("\nseo_score = {}", scores.seo_score));
        frontmatter.push_str(&format!("\nreadability_score = {}", scores.readability_score));
        frontmatter.push_str(&format!("\ngap_count = {}", report.semantic_gaps.len()));
    }

    frontmatter.push_str("\n+++\n");
    frontmatter
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

fn generate_gap_table(gaps: &[Gap]) -> String {
    let mut table = String::from("| # | Severity | Type | Description |\n");
    table.push_str("|---|----------|------|-------------|\n");

    for (i, gap) in gaps.iter().enumerate() {
        let gap_type = serde_json::to_value(gap.gap_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        table.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            gap.severity,
            gap_type,
            escape_pipe(&gap.description)
        ));
    }

    table
}

fn generate_remediation(index: usize, gap: &Gap) -> String {
    let mut section = format!("### {}. {}\n\n", index, gap.description);
    section.push_str(&format!("**Severity:** {}", gap.severity));
    if !gap.affected_topics.is_empty() {
        section.push_str(&format!(" | **Affects:** {}", gap.affected_topics.join(", ")));
    }
    section.push_str("\n\n");
    section.push_str(&format!("{}\n\n", gap.solution));

    if !gap.recommended_keywords.is_empty() {
        section.push_str(&format!("**Keywords:** {}\n\n", gap.recommended_keywords.join(", ")));
    }

    for suggestion in &gap.content_suggestions {
        section.push_str(&format!("- {}\n", suggestion));
    }
    if !gap.content_suggestions.is_empty() {
        section.push('\n');
    }

    section
}

fn generate_insights(report: &Report) -> String {
    let mut section = String::new();

    let mut push_list = |label: &str, items: &[String]| {
        if !items.is_empty() {
            section.push_str(&format!("- **{}:** {}\n", label, items.join(", ")));
        }
    };

    push_list("Tags", &report.tags);
    push_list("Key topics", &report.key_topics);
    push_list("Recommended topics", &report.recommended_topics);
    push_list("Missing entities", &report.missing_entities);

    for (cluster, keywords) in &report.semantic_clusters {
        section.push_str(&format!("- **{} keywords:** {}\n", cluster, keywords.join(", ")));
    }

    if section.is_empty() { section } else { format!("## Insights\n\n{}", section) }
}

/// Escape pipe characters for Markdown tables
fn escape_pipe(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, report: &Report) -> Result<String> {
        convert_to_markdown(report, &self.config)
    }
}
