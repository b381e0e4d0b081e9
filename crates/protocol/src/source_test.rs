//! Tests for SourceKind

use crate::source::SourceKind;

#[test]
fn test_source_kind_as_str() {
    assert_eq!(SourceKind::Jira.as_str(), "jira");
    assert_eq!(SourceKind::File.as_str(), "file");
}

#[test]
fn test_source_kind_display_matches_as_str() {
    assert_eq!(SourceKind::Jira.to_string(), "jira");
    assert_eq!(SourceKind::File.to_string(), "file");
}

#[test]
fn test_source_kind_is_remote() {
    assert!(SourceKind::Jira.is_remote());
    assert!(!SourceKind::File.is_remote());
}

#[test]
fn test_source_kind_serde() {
    assert_eq!(serde_json::to_string(&SourceKind::File).unwrap(), "\"file\"");
    let kind: SourceKind = serde_json::from_str("\"jira\"").unwrap();
    assert_eq!(kind, SourceKind::Jira);
}

#[test]
fn test_source_kind_rejects_unknown() {
    assert!(serde_json::from_str::<SourceKind>("\"github\"").is_err());
}
