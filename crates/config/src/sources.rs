//! Source configuration
//!
//! Every table under `[sources]` names one source instance. Only `type` and
//! `enabled` are interpreted here; the remaining keys are handed to the
//! connectors crate, which parses them per source type.
//!
//! # Example
//!
//! ```toml
//! [sources.jira_cloud]
//! type = "jira"
//! api_url = "https://acme.atlassian.net"
//! username = "audit-bot@acme.com"
//! api_token = "..."
//! categories = ["SECURITY", "ADMIN"]
//!
//! [sources.app_log]
//! type = "file"
//! path = "/var/log/app/audit.log"
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

/// All configured sources, keyed and ordered by name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    #[serde(flatten)]
    sources: BTreeMap<String, RawSourceConfig>,
}

impl SourcesConfig {
    /// Get a source config by name
    pub fn get(&self, name: &str) -> Option<&RawSourceConfig> {
        self.sources.get(name)
    }

    /// Iterate over all sources in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawSourceConfig)> {
        self.sources.iter()
    }

    /// Iterate over enabled sources in name order
    pub fn enabled(&self) -> impl Iterator<Item = (&String, &RawSourceConfig)> {
        self.sources.iter().filter(|(_, s)| s.enabled)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// One source entry before type-specific parsing
#[derive(Debug, Clone, Deserialize)]
pub struct RawSourceConfig {
    /// Source type ("jira" or "file")
    #[serde(rename = "type")]
    pub source_type: String,

    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Remaining type-specific keys
    #[serde(flatten)]
    pub config: toml::Value,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sources() {
        let config: SourcesConfig = toml::from_str("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_sources_keep_raw_fields() {
        let toml = r#"
[jira_cloud]
type = "jira"
api_url = "https://acme.atlassian.net"
categories = ["SECURITY"]

[app_log]
type = "file"
path = "/var/log/app.log"
"#;
        let config: SourcesConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.len(), 2);

        let jira = config.get("jira_cloud").unwrap();
        assert_eq!(jira.source_type, "jira");
        assert!(jira.enabled);
        assert_eq!(
            jira.config.get("api_url").and_then(|v| v.as_str()),
            Some("https://acme.atlassian.net")
        );
        assert!(jira.config.get("categories").unwrap().is_array());
        assert!(jira.config.get("type").is_none());
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let toml = r#"
[zeta]
type = "file"

[alpha]
type = "file"

[mid]
type = "jira"
"#;
        let config: SourcesConfig = toml::from_str(toml).unwrap();
        let names: Vec<_> = config.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_disabled_source_filtered() {
        let toml = r#"
[on]
type = "file"

[off]
type = "file"
enabled = false
"#;
        let config: SourcesConfig = toml::from_str(toml).unwrap();
        let enabled: Vec<_> = config.enabled().map(|(n, _)| n.as_str()).collect();
        assert_eq!(enabled, vec!["on"]);
    }

    #[test]
    fn test_type_is_required() {
        assert!(toml::from_str::<SourcesConfig>("[x]\npath = \"/tmp/a\"").is_err());
    }
}
