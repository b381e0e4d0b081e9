//! CSV renderer (one row per event, no header).

use siphon_protocol::{LogEvent, format_timestamp};

use crate::{EventRenderer, FormatError};

/// CSV column order.
pub const CSV_HEADERS: &[&str] = &[
    "timestamp",
    "category",
    "severity",
    "message",
    "event_id",
    "user",
    "ip_address",
];

/// CSV renderer with minimal quoting.
///
/// Line breaks inside fields are written as `\n` so every event stays on a
/// single line of the stream.
#[derive(Debug, Clone, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Header line for consumers that want one
    #[must_use]
    pub fn header_row() -> String {
        CSV_HEADERS.join(",")
    }
}

impl EventRenderer for CsvRenderer {
    fn render(&self, event: &LogEvent) -> Result<String, FormatError> {
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        let fields = [
            format_timestamp(&event.timestamp()),
            single_line(event.category()),
            event.severity().as_str().to_string(),
            single_line(event.message()),
            single_line(event.event_id().unwrap_or("")),
            single_line(event.user().unwrap_or("")),
            single_line(event.ip_address().unwrap_or("")),
        ];
        wtr.write_record(&fields)
            .map_err(|e| FormatError::FormatFailed(e.to_string()))?;

        let bytes = wtr
            .into_inner()
            .map_err(|e| FormatError::FormatFailed(e.to_string()))?;

        String::from_utf8(bytes)
            .map(|s| s.trim_end_matches(['\r', '\n']).to_string())
            .map_err(|e| FormatError::FormatFailed(e.to_string()))
    }
}

fn single_line(value: &str) -> String {
    value.replace("\r\n", "\\n").replace(['\n', '\r'], "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use siphon_protocol::{Severity, SourceKind};

    fn sample_event() -> LogEvent {
        LogEvent::builder(SourceKind::File)
            .timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .category("auth")
            .severity(Severity::Error)
            .message("login failed")
            .event_id(Some("17".into()))
            .user(Some("bob".into()))
            .ip_address(Some("10.0.0.1".into()))
            .build()
    }

    #[test]
    fn test_csv_row() {
        let output = CsvRenderer::new().render(&sample_event()).unwrap();
        assert_eq!(
            output,
            "2024-01-01T00:00:00.000000Z,auth,error,login failed,17,bob,10.0.0.1"
        );
    }

    #[test]
    fn test_csv_empty_optionals() {
        let event = LogEvent::builder(SourceKind::File)
            .timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .message("m")
            .build();
        let output = CsvRenderer::new().render(&event).unwrap();
        assert_eq!(output, "2024-01-01T00:00:00.000000Z,unknown,info,m,,,");
    }

    #[test]
    fn test_csv_quotes_commas_and_quotes() {
        let event = LogEvent::builder(SourceKind::File)
            .message(r#"disk "sda" at 91%, warn"#)
            .build();
        let output = CsvRenderer::new().render(&event).unwrap();
        assert!(output.contains(r#""disk ""sda"" at 91%, warn""#));
    }

    #[test]
    fn test_csv_single_line() {
        let event = LogEvent::builder(SourceKind::File)
            .message("first\nsecond\r\nthird")
            .build();
        let output = CsvRenderer::new().render(&event).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains(r"first\nsecond\nthird"));
    }

    #[test]
    fn test_header_row() {
        assert_eq!(
            CsvRenderer::header_row(),
            "timestamp,category,severity,message,event_id,user,ip_address"
        );
    }
}
