//! Tests for Severity normalization

use crate::severity::Severity;

#[test]
fn test_default_is_info() {
    assert_eq!(Severity::default(), Severity::Info);
}

#[test]
fn test_normalize_canonical_names() {
    for level in Severity::ALL {
        assert_eq!(Severity::normalize(level.as_str()), level);
    }
}

#[test]
fn test_normalize_is_case_insensitive() {
    assert_eq!(Severity::normalize("ERROR"), Severity::Error);
    assert_eq!(Severity::normalize("Warning"), Severity::Warning);
    assert_eq!(Severity::normalize("  CRITICAL "), Severity::Critical);
}

#[test]
fn test_normalize_aliases() {
    assert_eq!(Severity::normalize("WARN"), Severity::Warning);
    assert_eq!(Severity::normalize("err"), Severity::Error);
    assert_eq!(Severity::normalize("fatal"), Severity::Critical);
    assert_eq!(Severity::normalize("crit"), Severity::Critical);
    assert_eq!(Severity::normalize("trace"), Severity::Debug);
}

#[test]
fn test_normalize_unknown_is_info() {
    assert_eq!(Severity::normalize("notice"), Severity::Info);
    assert_eq!(Severity::normalize(""), Severity::Info);
    assert_eq!(Severity::normalize("urgent!!"), Severity::Info);
}

#[test]
fn test_ordering_lowest_first() {
    assert!(Severity::Debug < Severity::Info);
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
    assert!(Severity::Error < Severity::Critical);
}

#[test]
fn test_display() {
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Critical.to_string(), "critical");
}

#[test]
fn test_serde_uses_lowercase_names() {
    let json = serde_json::to_string(&Severity::Error).unwrap();
    assert_eq!(json, "\"error\"");
}

#[test]
fn test_deserialize_normalizes() {
    let level: Severity = serde_json::from_str("\"WARN\"").unwrap();
    assert_eq!(level, Severity::Warning);

    let level: Severity = serde_json::from_str("\"bogus\"").unwrap();
    assert_eq!(level, Severity::Info);
}
