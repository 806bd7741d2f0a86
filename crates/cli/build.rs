use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("semgap")
        .version("1.0.0")
        .author("Semgap Contributors")
        .about("Find content gaps and score web pages against a topic taxonomy")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, markdown, text)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["json", "markdown", "text"]),
        )
        .arg(clap::arg!(--url <URL> "Source URL of file or stdin input, used to classify links").value_name("URL"))
        .arg(
            clap::arg!(--taxonomy <FILE> "Taxonomy JSON file (default: ~/.config/semgap/taxonomy.json or built-in)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("15"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--no_gaps "Skip gap analysis"))
        .arg(
            clap::arg!(--max_content_length <NUM> "Maximum characters of page text analyzed (0 = unlimited)")
                .default_value("50000"),
        )
        .arg(clap::arg!(--pretty "Pretty print JSON output"))
        .arg(clap::arg!(-v --verbose "Print analysis steps and timings"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "semgap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "semgap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "semgap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "semgap", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
