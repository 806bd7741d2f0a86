use std::time::Duration;

use owo_colors::OwoColorize;
use semgap_core::Report;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Semgap".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "See the meaning behind search\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled value under the current step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print one stage timing; over 100ms is flagged slow
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print the analysis summary: scores, topics and gap counts by severity
pub fn print_report_details(report: &Report) {
    eprintln!();
    print_section("Analysis Details");

    let scores = &report.scores;
    print_detail("Words", &report.word_count.to_string());
    print_detail("Topic relevance", &format!("{:.3}", scores.topic_relevance_score));
    print_detail("Content quality", &format!("{:.3}", scores.content_quality_score));
    print_detail("SEO", &format!("{:.3}", scores.seo_score));
    print_detail("Readability", &format!("{:.3}", scores.readability_score));

    if !report.key_topics.is_empty() {
        print_detail("Topics", &report.key_topics.join(", "));
    }

    let count = |severity: &str| report.semantic_gaps.iter().filter(|g| g.severity.as_str() == severity).count();
    eprintln!(
        "  {} {} ({} high, {} medium, {} low)\n",
        "Gaps:".dimmed(),
        report.semantic_gaps.len().to_string().bright_white(),
        count("high").red(),
        count("medium").yellow(),
        count("low").dimmed()
    );
}

/// Print per-stage timings followed by the total
pub fn print_timing_summary(total: Duration, timings: &[(String, Duration)]) {
    print_section("Timing Summary");

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        format!("{}:", "Total").bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
}

fn print_section(title: &str) {
    let rule = "═".repeat(60);
    eprintln!("{}\n{}\n{}", rule.dimmed(), title.bold().cyan(), rule.dimmed());
}

/// Human-readable byte size of the fetched page
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
