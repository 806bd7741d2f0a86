use crate::Result;
use crate::report::Report;

/// Keys dropped when detail output is disabled
const DETAIL_KEYS: [&str; 2] = ["structure", "topic_coverage"];

/// Configuration for JSON output
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
    /// Include structural features and per-topic coverage
    pub include_details: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { pretty: false, include_details: true }
    }
}

/// Convert a report to JSON
pub fn convert_to_json(report: &Report, config: &JsonConfig) -> Result<String> {
    let mut value = serde_json::to_value(report)?;

    if !config.include_details
        && let Some(object) = value.as_object_mut()
    {
        for key in DETAIL_KEYS {
            object.remove(key);
        }
    }

    if config.pretty { Ok(serde_json::to_string_pretty(&value)?) } else { Ok(serde_json::to_string(&value)?) }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, report: &Report) -> Result<String> {
        convert_to_json(report, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::DocumentFeatures;

    fn sample_report() -> Report {
        Report {
            url: "https://example.com/guide".to_string(),
            title: Some("Crypto Guide".to_string()),
            word_count: 120,
            structure: Some(DocumentFeatures { h1_count: 1, ..Default::default() }),
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_to_json_compact() {
        let json = convert_to_json(&sample_report(), &JsonConfig::default()).unwrap();

        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Crypto Guide");
        assert_eq!(value["structure"]["h1_count"], 1);
    }

    #[test]
    fn test_convert_to_json_pretty() {
        let config = JsonConfig { pretty: true, ..Default::default() };
        let json = convert_to_json(&sample_report(), &config).unwrap();
        assert!(json.contains("\n  \"url\""));
    }

    #[test]
    fn test_convert_to_json_without_details() {
        let config = JsonConfig { include_details: false, ..Default::default() };
        let json = JsonFormatter::new(config).convert(&sample_report()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("structure").is_none());
        assert!(value.get("topic_coverage").is_none());
        assert_eq!(value["word_count"], 120);
    }
}
