//! Content fetching from URLs, files, and stdin.
//!
//! The analysis engine never performs I/O; this module is the collaborator
//! that retrieves the HTML it is handed. Network fetching is gated behind the
//! `fetch` feature.

use std::fs;
use std::path::PathBuf;

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{Result, SemgapError};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (compatible; semgap/1.0)"
                .to_string(),
        }
    }
}

/// Fetches HTML content from a URL.
///
/// Performs an HTTP GET request and returns the response body as text.
/// Follows redirects, respects the configured timeout and rejects any
/// non-success status with [`SemgapError::HttpStatus`].
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_http_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(SemgapError::HttpError)?;

    tracing::debug!(url = %parsed_url, timeout = config.timeout, "Fetching document");

    let response = client
        .get(parsed_url.clone())
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| map_transport_error(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SemgapError::HttpStatus { status: status.as_u16(), url: parsed_url.to_string() });
    }

    let content = response
        .text()
        .await
        .map_err(|e| map_transport_error(e, config.timeout))?;

    Ok(content)
}

#[cfg(feature = "fetch")]
fn map_transport_error(err: reqwest::Error, timeout: u64) -> SemgapError {
    if err.is_timeout() { SemgapError::Timeout { timeout } } else { SemgapError::HttpError(err) }
}

/// Parses a URL and requires an http or https scheme with a host.
#[cfg(feature = "fetch")]
pub fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| SemgapError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SemgapError::InvalidUrl(
            "URL must use the http:// or https:// scheme".to_string(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(SemgapError::InvalidUrl("No host found in URL".to_string()));
    }

    Ok(parsed)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(SemgapError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(SemgapError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(SemgapError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 15);
        assert!(config.user_agent.contains("Mozilla"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_url("not-a-url", &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(SemgapError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(parse_http_url("https://example.com/post").is_ok());
        assert!(parse_http_url("http://example.com").is_ok());
        assert!(matches!(parse_http_url("ftp://example.com/file"), Err(SemgapError::InvalidUrl(_))));
        assert!(matches!(parse_http_url("example.com"), Err(SemgapError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(SemgapError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<h1>Hello</h1>").unwrap();

        let content = fetch_file(path.to_str().unwrap()).unwrap();
        assert_eq!(content, "<h1>Hello</h1>");
    }
}
