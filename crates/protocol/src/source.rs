//! Source kind tag
//!
//! `SourceKind` records which kind of origin produced an event.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of source that produced an event
///
/// # Example
///
/// ```
/// use siphon_protocol::SourceKind;
///
/// assert_eq!(SourceKind::Jira.as_str(), "jira");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Jira Cloud audit log (remote REST API)
    Jira,
    /// Local append-only file
    File,
}

impl SourceKind {
    /// Get the wire name of this source kind
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jira => "jira",
            Self::File => "file",
        }
    }

    /// Whether events come from a remote API
    #[inline]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Jira)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
