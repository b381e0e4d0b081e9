//! CEF v0 (Common Event Format) renderer.
//!
//! `CEF:0|vendor|product|version|category|message|severity|extension`

use serde_json::Value;
use siphon_protocol::{LogEvent, Severity, format_timestamp};

use crate::{EventRenderer, FormatError};

/// CEF v0 renderer.
#[derive(Debug, Clone)]
pub struct CefRenderer {
    vendor: String,
    product: String,
    version: String,
}

impl CefRenderer {
    #[must_use]
    pub fn new(vendor: &str, product: &str, version: &str) -> Self {
        Self {
            vendor: escape_header_value(vendor),
            product: escape_header_value(product),
            version: escape_header_value(version),
        }
    }

    fn format_extensions(event: &LogEvent) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut push = |key: &str, value: &str| {
            parts.push(format!("{key}={}", escape_extension_value(value)));
        };

        push("msg", event.message());
        push("cat", event.category());
        if let Some(ip) = event.ip_address() {
            push("src", ip);
        }
        if let Some(user) = event.user() {
            push("duser", user);
        }
        if let Some(id) = event.event_id() {
            push("eventId", id);
        }
        push("rt", &format_timestamp(&event.timestamp()));

        for (key, value) in event.raw_data() {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            push(&format!("raw_{key}"), &value);
        }

        parts.join(" ")
    }
}

impl Default for CefRenderer {
    fn default() -> Self {
        Self::new("Siphon", "Siphon", env!("CARGO_PKG_VERSION"))
    }
}

impl EventRenderer for CefRenderer {
    fn render(&self, event: &LogEvent) -> Result<String, FormatError> {
        Ok(format!(
            "CEF:0|{}|{}|{}|{}|{}|{}|{}",
            self.vendor,
            self.product,
            self.version,
            escape_header_value(event.category()),
            escape_header_value(event.message()),
            cef_severity(event.severity()),
            Self::format_extensions(event)
        ))
    }
}

/// CEF severity (0-10) for a canonical severity
pub fn cef_severity(severity: Severity) -> u8 {
    match severity {
        Severity::Critical => 10,
        Severity::Error => 8,
        Severity::Warning => 6,
        Severity::Info => 4,
        Severity::Debug => 2,
    }
}

/// Escape pipe and backslash; line breaks become spaces.
fn escape_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\r' | '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Escape equals, backslash and line breaks.
fn escape_extension_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '=' => out.push_str("\\="),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}
