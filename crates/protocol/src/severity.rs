//! Canonical severity levels
//!
//! Every source maps its own notion of severity onto these five levels.
//! Anything unrecognized becomes `Info`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a canonical event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Severity {
    /// Debugging detail
    Debug,
    /// Normal operation (default)
    #[default]
    Info,
    /// Something worth a look
    Warning,
    /// A failed operation
    Error,
    /// Security relevant or service affecting
    Critical,
}

impl Severity {
    /// All levels, lowest first
    pub const ALL: [Severity; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Normalize free-form input into a canonical level
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unknown values normalize to `Info`.
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" | "crit" | "fatal" => Self::Critical,
            "error" | "err" => Self::Error,
            "warning" | "warn" => Self::Warning,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }

    /// Get the canonical lowercase name
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<Severity> for &'static str {
    fn from(value: Severity) -> Self {
        value.as_str()
    }
}
