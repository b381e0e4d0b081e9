//! Source configuration types
//!
//! Each source type defines its own config struct here. Configs are parsed
//! from the raw TOML table the config crate leaves under `[sources.<name>]`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConnectorError;
use crate::resilience::{
    DEFAULT_JITTER_MAX_MS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_TIMEOUT_SECS,
    ResilienceConfig,
};

/// Jira Cloud caps audit-record pages at this size
pub const JIRA_MAX_PAGE_SIZE: u32 = 1000;

/// Jira audit log source configuration
///
/// # Example
///
/// ```toml
/// [sources.jira_cloud]
/// type = "jira"
/// api_url = "https://acme.atlassian.net"
/// username = "audit-bot@acme.com"
/// api_token = "ATATT3x..."
/// categories = ["SECURITY", "ADMIN"]  # optional, default: all
/// page_size = 1000                     # optional, clamped to 1000
/// timeout_secs = 30                    # optional, request timeout
/// max_retries = 5                      # optional, per page
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JiraSourceConfig {
    /// Site base URL, without the REST path
    pub api_url: String,

    /// Account used for basic auth
    pub username: String,

    /// API token used as the basic-auth password
    #[serde(alias = "password")]
    pub api_token: String,

    /// Categories to keep; `all` keeps everything
    pub categories: Vec<String>,

    /// Records requested per page
    pub page_size: u32,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Retries per page on rate limiting or transient failure (default: 5)
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds (default: 2000)
    pub retry_base_delay_ms: u64,
}

impl Default for JiraSourceConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            username: String::new(),
            api_token: String::new(),
            categories: default_categories(),
            page_size: JIRA_MAX_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

impl JiraSourceConfig {
    /// Parse config from raw TOML value
    pub fn from_toml(value: &toml::Value) -> Result<Self, ConnectorError> {
        value.clone().try_into().map_err(|e: toml::de::Error| {
            ConnectorError::ConfigError(format!("invalid jira source config: {e}"))
        })
    }

    /// Page size after applying the server limit
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, JIRA_MAX_PAGE_SIZE)
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::new(&self.categories)
    }

    /// Build resilience config from these settings
    pub fn resilience_config(&self) -> ResilienceConfig {
        ResilienceConfig {
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            retry_base_delay_ms: self.retry_base_delay_ms,
            jitter_max_ms: DEFAULT_JITTER_MAX_MS,
        }
    }
}

/// Local file source configuration
///
/// # Example
///
/// ```toml
/// [sources.app_log]
/// type = "file"
/// path = "/var/log/app/audit.log"
/// start_at_end = false   # optional, skip content present at startup
/// categories = ["all"]   # optional
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    /// File to tail
    pub path: Option<PathBuf>,

    /// Categories to keep; `all` keeps everything
    pub categories: Vec<String>,

    /// Begin at the current end of file instead of the beginning
    pub start_at_end: bool,
}

impl Default for FileSourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            categories: default_categories(),
            start_at_end: false,
        }
    }
}

impl FileSourceConfig {
    /// Parse config from raw TOML value
    pub fn from_toml(value: &toml::Value) -> Result<Self, ConnectorError> {
        value.clone().try_into().map_err(|e: toml::de::Error| {
            ConnectorError::ConfigError(format!("invalid file source config: {e}"))
        })
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::new(&self.categories)
    }
}

fn default_categories() -> Vec<String> {
    vec!["all".to_string()]
}

/// Case-insensitive category allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Vec<String>),
}

impl CategoryFilter {
    /// `all` anywhere in the list, or an empty list, keeps everything
    pub fn new(categories: &[String]) -> Self {
        if categories.is_empty() || categories.iter().any(|c| c.eq_ignore_ascii_case("all")) {
            Self::All
        } else {
            Self::Only(categories.iter().map(|c| c.to_ascii_lowercase()).collect())
        }
    }

    pub fn allows(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(allowed) => allowed.iter().any(|c| c.eq_ignore_ascii_case(category)),
        }
    }
}
