//! Wire format selection
//!
//! # Example
//!
//! ```toml
//! [format]
//! type = "cef"
//! cef_vendor = "Acme"
//! cef_product = "AuditBridge"
//! ```

use serde::Deserialize;

/// Rendering of events on the wire
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    /// ArcSight Common Event Format
    Cef,
    /// One CSV row per event
    Csv,
    /// One JSON object per event (default)
    #[default]
    Json,
}

impl FormatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cef => "cef",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Output format
    #[serde(rename = "type")]
    pub format_type: FormatType,

    /// CEF device vendor
    pub cef_vendor: String,

    /// CEF device product
    pub cef_product: String,

    /// CEF device version (defaults to the running version)
    pub cef_version: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            format_type: FormatType::Json,
            cef_vendor: "Siphon".to_string(),
            cef_product: "Siphon".to_string(),
            cef_version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_json() {
        let config: FormatConfig = toml::from_str("").unwrap();
        assert_eq!(config.format_type, FormatType::Json);
        assert_eq!(config.cef_vendor, "Siphon");
        assert!(config.cef_version.is_none());
    }

    #[test]
    fn test_cef_with_overrides() {
        let toml = r#"
type = "cef"
cef_vendor = "Acme"
cef_version = "2.1"
"#;
        let config: FormatConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.format_type, FormatType::Cef);
        assert_eq!(config.cef_vendor, "Acme");
        assert_eq!(config.cef_product, "Siphon");
        assert_eq!(config.cef_version.as_deref(), Some("2.1"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(toml::from_str::<FormatConfig>(r#"type = "xml""#).is_err());
    }

    #[test]
    fn test_as_str() {
        assert_eq!(FormatType::Csv.as_str(), "csv");
    }
}
