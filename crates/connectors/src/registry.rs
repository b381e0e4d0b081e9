//! Runtime source dispatch
//!
//! Sources are chosen from configuration at startup. `SourceImpl` wraps the
//! concrete types in an enum so callers get runtime polymorphism without
//! boxing futures.

use std::sync::Arc;

use siphon_protocol::{LogEvent, SourceKind};

use crate::checkpoint::CheckpointStore;
use crate::config::{FileSourceConfig, JiraSourceConfig};
use crate::error::ConnectorError;
use crate::file::FileSource;
use crate::jira::JiraSource;
use crate::traits::{FetchWindow, Source};

/// Source types this crate can build
pub fn available_sources() -> &'static [&'static str] {
    &["jira", "file"]
}

/// Any configured source
pub enum SourceImpl {
    Jira(JiraSource),
    File(FileSource),
}

impl SourceImpl {
    /// Build a source from its `[sources.<name>]` table
    ///
    /// # Errors
    ///
    /// Returns `UnknownSource` for an unsupported `source_type` and
    /// `ConfigError` if the type-specific fields do not parse.
    pub fn from_config(
        name: &str,
        source_type: &str,
        raw: &toml::Value,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Result<Self, ConnectorError> {
        match source_type {
            "jira" => {
                let config = JiraSourceConfig::from_toml(raw)?;
                Ok(Self::Jira(JiraSource::new(name, config, checkpoints)))
            }
            "file" => {
                let config = FileSourceConfig::from_toml(raw)?;
                Ok(Self::File(FileSource::new(name, config)))
            }
            other => Err(ConnectorError::UnknownSource(other.to_string())),
        }
    }
}

impl Source for SourceImpl {
    fn name(&self) -> &str {
        match self {
            Self::Jira(s) => s.name(),
            Self::File(s) => s.name(),
        }
    }

    fn kind(&self) -> SourceKind {
        match self {
            Self::Jira(s) => s.kind(),
            Self::File(s) => s.kind(),
        }
    }

    fn validate(&self) -> bool {
        match self {
            Self::Jira(s) => s.validate(),
            Self::File(s) => s.validate(),
        }
    }

    async fn fetch(&self, window: FetchWindow) -> Result<Vec<LogEvent>, ConnectorError> {
        match self {
            Self::Jira(s) => s.fetch(window).await,
            Self::File(s) => s.fetch(window).await,
        }
    }
}

impl From<JiraSource> for SourceImpl {
    fn from(source: JiraSource) -> Self {
        Self::Jira(source)
    }
}

impl From<FileSource> for SourceImpl {
    fn from(source: FileSource) -> Self {
        Self::File(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::MemoryCheckpointStore;

    fn store() -> Arc<dyn CheckpointStore> {
        Arc::new(MemoryCheckpointStore::new())
    }

    #[test]
    fn test_build_jira() {
        let raw: toml::Value = toml::from_str(
            r#"
api_url = "https://acme.atlassian.net"
username = "bot"
api_token = "t"
"#,
        )
        .unwrap();
        let source = SourceImpl::from_config("jira_cloud", "jira", &raw, store()).unwrap();
        assert!(matches!(source, SourceImpl::Jira(_)));
        assert_eq!(source.name(), "jira_cloud");
        assert_eq!(source.kind(), SourceKind::Jira);
        assert!(source.validate());
    }

    #[test]
    fn test_build_file_without_existing_path_is_invalid() {
        let raw: toml::Value = toml::from_str(r#"path = "/nonexistent/app.log""#).unwrap();
        let source = SourceImpl::from_config("app", "file", &raw, store()).unwrap();
        assert_eq!(source.kind(), SourceKind::File);
        assert!(!source.validate());
    }

    #[test]
    fn test_unknown_type() {
        let raw = toml::Value::Table(Default::default());
        let result = SourceImpl::from_config("gh", "github", &raw, store());
        assert!(matches!(result, Err(ConnectorError::UnknownSource(t)) if t == "github"));
    }

    #[test]
    fn test_bad_fields() {
        let raw: toml::Value = toml::from_str("start_at_end = \"yes\"").unwrap();
        let result = SourceImpl::from_config("app", "file", &raw, store());
        assert!(matches!(result, Err(ConnectorError::ConfigError(_))));
    }

    #[test]
    fn test_available_sources() {
        assert_eq!(available_sources(), &["jira", "file"]);
    }
}
