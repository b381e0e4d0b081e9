//! JSON renderer (one compact object per event).

use siphon_protocol::LogEvent;

use crate::{EventRenderer, FormatError};

#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventRenderer for JsonRenderer {
    fn render(&self, event: &LogEvent) -> Result<String, FormatError> {
        Ok(serde_json::to_string(event)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use siphon_protocol::{RawData, Severity, SourceKind};

    fn sample_event() -> LogEvent {
        let mut raw = RawData::new();
        raw.insert("nested".into(), json!({"a": [1, 2, 3]}));

        LogEvent::builder(SourceKind::Jira)
            .timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
            .category("ADMIN")
            .severity(Severity::Warning)
            .message("Workflow \"Default\" edited")
            .event_id(Some("1001".into()))
            .raw_data(raw)
            .build()
    }

    #[test]
    fn test_json_fields() {
        let output = JsonRenderer::new().render(&sample_event()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["timestamp"], "2024-05-01T08:00:00.000000Z");
        assert_eq!(value["source"], "jira");
        assert_eq!(value["category"], "ADMIN");
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["event_id"], "1001");
        assert!(value["user"].is_null());
        assert_eq!(value["raw_data"]["nested"]["a"][2], 3);
    }

    #[test]
    fn test_json_round_trip() {
        let event = sample_event();
        let output = JsonRenderer::new().render(&event).unwrap();
        let parsed: LogEvent = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_json_round_trip_sub_second_timestamps() {
        let precise = Utc.timestamp_opt(1_704_067_200, 123_456_789).unwrap();
        let events = [
            LogEvent::builder(SourceKind::File).timestamp(precise).build(),
            LogEvent::builder(SourceKind::File).message("now").build(),
        ];

        for event in events {
            let output = JsonRenderer::new().render(&event).unwrap();
            let parsed: LogEvent = serde_json::from_str(&output).unwrap();
            assert_eq!(parsed, event, "rendered as {output}");
        }

        let value: Value = serde_json::from_str(
            &JsonRenderer::new()
                .render(&LogEvent::builder(SourceKind::File).timestamp(precise).build())
                .unwrap(),
        )
        .unwrap();
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00.123456Z");
    }

    #[test]
    fn test_json_is_single_line() {
        let event = LogEvent::builder(SourceKind::File)
            .message("a\nb")
            .build();
        let output = JsonRenderer::new().render(&event).unwrap();
        assert!(!output.contains('\n'));
    }
}
