//! Server configuration read from the environment.

use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8001;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime settings of the HTTP server.
///
/// | variable | default |
/// |---|---|
/// | `HOST` | `0.0.0.0` |
/// | `PORT` | `8001` |
/// | `CORS_ORIGINS` | `["*"]` (JSON array) |
/// | `SEMGAP_TAXONOMY_PATH` | built-in taxonomy lookup |
/// | `FETCH_TIMEOUT_SECS` | `15` |
/// | `REQUEST_TIMEOUT_SECS` | `60` |
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub taxonomy_path: Option<PathBuf>,
    pub fetch_timeout: u64,
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            taxonomy_path: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT_SECS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            cors_origins: lookup("CORS_ORIGINS").map(|raw| parse_origins(&raw)).unwrap_or(defaults.cors_origins),
            taxonomy_path: lookup("SEMGAP_TAXONOMY_PATH").map(PathBuf::from),
            fetch_timeout: parse_var(&lookup, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            request_timeout: parse_var(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

/// Parse a JSON array of origins, falling back to `*` on malformed input
fn parse_origins(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(origins) if !origins.is_empty() => origins,
        Ok(_) => vec!["*".to_string()],
        Err(e) => {
            tracing::warn!(error = %e, "Invalid CORS_ORIGINS, allowing all origins");
            vec!["*".to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "0.0.0.0:8001");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CORS_ORIGINS", r#"["https://app.example.com", "http://localhost:3000"]"#),
            ("SEMGAP_TAXONOMY_PATH", "/etc/semgap/taxonomy.json"),
            ("FETCH_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.cors_origins, vec!["https://app.example.com", "http://localhost:3000"]);
        assert_eq!(config.taxonomy_path, Some(PathBuf::from("/etc/semgap/taxonomy.json")));
        assert_eq!(config.fetch_timeout, 5);
        assert_eq!(config.request_timeout, 60);
    }

    #[test]
    fn test_invalid_cors_falls_back_to_wildcard() {
        let config = ServerConfig::from_lookup(lookup(&[("CORS_ORIGINS", "https://a.example, https://b.example")])).unwrap();
        assert_eq!(config.cors_origins, vec!["*"]);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue { name: "PORT", value: "eighty".to_string() });
    }
}
