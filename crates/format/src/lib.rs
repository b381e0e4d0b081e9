//! Siphon - Wire formats
//!
//! Renders a `LogEvent` into the single-line payload sent to the collector.
//! Renderers are pure: no I/O, no shared state, safe to call from any task.
//!
//! Supported formats:
//! - CEF v0 (Common Event Format)
//! - CSV (one row, no header)
//! - JSON (one object per line)

pub mod cef;
pub mod csv;
pub mod json;

use siphon_config::{FormatConfig, FormatType};
use siphon_protocol::LogEvent;
use thiserror::Error;

pub use self::cef::CefRenderer;
pub use self::csv::CsvRenderer;
pub use self::json::JsonRenderer;

/// Errors from event rendering
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format error: {0}")]
    FormatFailed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for rendering events into one wire payload
pub trait EventRenderer: Send + Sync {
    /// Render a single event (without trailing newline)
    fn render(&self, event: &LogEvent) -> Result<String, FormatError>;
}

/// Renderer selected by configuration
#[derive(Debug, Clone)]
pub enum Renderer {
    Cef(CefRenderer),
    Csv(CsvRenderer),
    Json(JsonRenderer),
}

impl Renderer {
    pub fn from_config(config: &FormatConfig) -> Self {
        match config.format_type {
            FormatType::Cef => Self::Cef(CefRenderer::new(
                &config.cef_vendor,
                &config.cef_product,
                config
                    .cef_version
                    .as_deref()
                    .unwrap_or(env!("CARGO_PKG_VERSION")),
            )),
            FormatType::Csv => Self::Csv(CsvRenderer::new()),
            FormatType::Json => Self::Json(JsonRenderer::new()),
        }
    }

    /// Short name of the active format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cef(_) => "cef",
            Self::Csv(_) => "csv",
            Self::Json(_) => "json",
        }
    }
}

impl EventRenderer for Renderer {
    fn render(&self, event: &LogEvent) -> Result<String, FormatError> {
        match self {
            Self::Cef(r) => r.render(event),
            Self::Csv(r) => r.render(event),
            Self::Json(r) => r.render(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siphon_protocol::SourceKind;

    fn config(format_type: FormatType) -> FormatConfig {
        FormatConfig {
            format_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_from_config_selects_renderer() {
        assert_eq!(Renderer::from_config(&config(FormatType::Cef)).name(), "cef");
        assert_eq!(Renderer::from_config(&config(FormatType::Csv)).name(), "csv");
        assert_eq!(Renderer::from_config(&config(FormatType::Json)).name(), "json");
    }

    #[test]
    fn test_cef_defaults_to_crate_version() {
        let renderer = Renderer::from_config(&config(FormatType::Cef));
        let event = LogEvent::builder(SourceKind::File).message("m").build();
        let line = renderer.render(&event).unwrap();
        assert!(line.starts_with(&format!(
            "CEF:0|Siphon|Siphon|{}|",
            env!("CARGO_PKG_VERSION")
        )));
    }

    #[test]
    fn test_rendered_lines_have_no_newline() {
        let event = LogEvent::builder(SourceKind::File)
            .message("multi\nline")
            .build();
        for format_type in [FormatType::Cef, FormatType::Csv, FormatType::Json] {
            let line = Renderer::from_config(&config(format_type))
                .render(&event)
                .unwrap();
            assert!(!line.ends_with('\n'), "{format_type:?}");
        }
    }
}
