mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use semgap_core::{
    Analyzer, AnalyzerConfig, FetchConfig, JsonConfig, MarkdownConfig, TaxonomyLoader, TextConfig, convert_to_json,
    convert_to_markdown, convert_to_text, fetch_file, fetch_stdin, fetch_url,
};
use url::Url;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, markdown, text", s)),
        }
    }
}

/// Analyze a web page for content gaps, topic coverage and quality scores
#[derive(Parser, Debug)]
#[command(name = "semgap")]
#[command(author = "Semgap Contributors")]
#[command(version)]
#[command(about = "Find content gaps and score web pages against a topic taxonomy", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, markdown, text)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Source URL of file or stdin input, used to classify links
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Taxonomy JSON file (default: ~/.config/semgap/taxonomy.json or built-in)
    #[arg(long, value_name = "FILE")]
    taxonomy: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Skip gap analysis
    #[arg(long)]
    no_gaps: bool,

    /// Maximum characters of page text analyzed (0 = unlimited)
    #[arg(long, default_value = "50000", value_name = "NUM")]
    max_content_length: usize,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print analysis steps and timings
    #[arg(short, long)]
    verbose: bool,
}

fn is_http_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let start = Instant::now();
    let mut timings: Vec<(String, Duration)> = Vec::new();

    if args.verbose {
        echo::print_banner();
    }

    let step = Instant::now();
    let remote = is_http_url(&args.input);
    let html = if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if remote {
        if args.verbose {
            echo::print_step(1, 4, &format!("Fetching from {}", args.input.bright_white().underline()));
        }

        let mut config = FetchConfig { timeout: args.timeout, ..Default::default() };
        if let Some(user_agent) = &args.user_agent {
            config.user_agent = user_agent.clone();
        }

        fetch_url(&args.input, &config).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            echo::print_step(1, 4, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };
    timings.push(("Read input".to_string(), step.elapsed()));

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(html.len()));
        eprintln!();
    }

    let step = Instant::now();
    if args.verbose {
        echo::print_step(2, 4, "Loading taxonomy");
    }

    let mut loader = TaxonomyLoader::new();
    if let Some(path) = &args.taxonomy {
        loader = loader.path(path);
    }
    let taxonomy = loader.load().context("Failed to load taxonomy")?;
    timings.push(("Load taxonomy".to_string(), step.elapsed()));

    if args.verbose {
        echo::print_detail("Topics", &taxonomy.len().to_string());
        eprintln!();
    }

    let step = Instant::now();
    if args.verbose {
        echo::print_step(3, 4, "Analyzing content");
    }

    let config = AnalyzerConfig::builder()
        .perform_gap_analysis(!args.no_gaps)
        .max_content_length(args.max_content_length)
        .build();
    let analyzer = Analyzer::with_taxonomy_and_config(taxonomy, config);

    let source_url = args.url.clone().or_else(|| remote.then(|| args.input.clone()));
    let report = analyzer
        .analyze_html(&html, source_url.as_deref())
        .context("Failed to analyze content")?;
    timings.push(("Analyze".to_string(), step.elapsed()));

    if args.verbose {
        if let Some(title) = &report.title {
            echo::print_detail("Title", title);
        }
        echo::print_report_details(&report);
        if let Some(warning) = &report.warning {
            echo::print_warning(warning);
            eprintln!();
        }
    }

    let step = Instant::now();
    let output = match args.format {
        OutputFormat::Json => {
            let config = JsonConfig { pretty: args.pretty, ..Default::default() };
            convert_to_json(&report, &config).context("Failed to convert to JSON")?
        }
        OutputFormat::Markdown => {
            convert_to_markdown(&report, &MarkdownConfig::default()).context("Failed to convert to Markdown")?
        }
        OutputFormat::Text => convert_to_text(&report, &TextConfig::default()).context("Failed to convert to text")?,
    };
    timings.push(("Render".to_string(), step.elapsed()));

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
        echo::print_timing_summary(start.elapsed(), &timings);
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Report written to {}", path.display().bright_white()));
        }
        None => {
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
        }
    }

    if args.verbose {
        echo::print_info(&format!("{} gaps found", report.semantic_gaps.len()));
    }

    Ok(())
}
