//! Tests for LogEvent and its builder

use chrono::{SubsecRound, TimeZone, Utc};
use serde_json::json;

use crate::event::{LogEvent, RawData};
use crate::severity::Severity;
use crate::source::SourceKind;

fn sample_event() -> LogEvent {
    let mut raw = RawData::new();
    raw.insert("objectItem".into(), json!({"name": "PROJ"}));
    raw.insert("id".into(), json!(42));

    LogEvent::builder(SourceKind::Jira)
        .timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
        .category("SECURITY")
        .severity(Severity::Critical)
        .message("Permission scheme changed")
        .event_id(Some("42".into()))
        .user(Some("Ada Admin".into()))
        .ip_address(Some("10.1.2.3".into()))
        .raw_data(raw)
        .build()
}

// =============================================================================
// Builder tests
// =============================================================================

#[test]
fn test_builder_defaults() {
    let before = Utc::now().trunc_subsecs(6);
    let event = LogEvent::builder(SourceKind::File).build();
    let after = Utc::now();

    assert_eq!(event.source(), SourceKind::File);
    assert_eq!(event.category(), "unknown");
    assert_eq!(event.severity(), Severity::Info);
    assert_eq!(event.message(), "");
    assert!(event.event_id().is_none());
    assert!(event.user().is_none());
    assert!(event.ip_address().is_none());
    assert!(event.raw_data().is_empty());
    assert!(event.timestamp() >= before && event.timestamp() <= after);
}

#[test]
fn test_builder_truncates_to_microseconds() {
    let precise = Utc.timestamp_opt(1_704_067_200, 123_456_789).unwrap();
    let event = LogEvent::builder(SourceKind::File).timestamp(precise).build();
    assert_eq!(
        event.timestamp(),
        Utc.timestamp_opt(1_704_067_200, 123_456_000).unwrap()
    );
}

#[test]
fn test_builder_sets_all_fields() {
    let event = sample_event();

    assert_eq!(event.source(), SourceKind::Jira);
    assert_eq!(event.category(), "SECURITY");
    assert_eq!(event.severity(), Severity::Critical);
    assert_eq!(event.message(), "Permission scheme changed");
    assert_eq!(event.event_id(), Some("42"));
    assert_eq!(event.user(), Some("Ada Admin"));
    assert_eq!(event.ip_address(), Some("10.1.2.3"));
    assert_eq!(event.raw_data().len(), 2);
}

// =============================================================================
// Serde tests
// =============================================================================

#[test]
fn test_serialize_field_names() {
    let value = serde_json::to_value(sample_event()).unwrap();
    let obj = value.as_object().unwrap();

    for key in [
        "timestamp",
        "source",
        "category",
        "severity",
        "message",
        "event_id",
        "user",
        "ip_address",
        "raw_data",
    ] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    assert_eq!(obj["timestamp"], "2024-05-01T08:00:00.000000Z");
    assert_eq!(obj["source"], "jira");
    assert_eq!(obj["severity"], "critical");
}

#[test]
fn test_serialize_none_as_null() {
    let event = LogEvent::builder(SourceKind::File).message("x").build();
    let value = serde_json::to_value(event).unwrap();
    assert!(value["event_id"].is_null());
    assert!(value["user"].is_null());
}

#[test]
fn test_deserialize_roundtrip_preserves_event() {
    let event = sample_event();
    let json = serde_json::to_string(&event).unwrap();
    let parsed: LogEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
}

#[test]
fn test_deserialize_rejects_bad_timestamp() {
    let json = r#"{"timestamp":"soon","source":"file","category":"x"}"#;
    assert!(serde_json::from_str::<LogEvent>(json).is_err());
}

#[test]
fn test_deserialize_minimal_applies_defaults() {
    let json = r#"{"timestamp":"2024-01-01T00:00:00","source":"file","category":"auth"}"#;
    let event: LogEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.severity(), Severity::Info);
    assert_eq!(event.message(), "");
    assert!(event.raw_data().is_empty());
}
