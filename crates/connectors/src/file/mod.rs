//! Local file source
//!
//! Tails an append-only log file by byte offset. Each fetch consumes the
//! complete lines written since the previous fetch; a trailing partial line
//! is left for the next cycle. If the file shrank (truncated or rotated in
//! place) reading restarts from the beginning.
//!
//! Lines are JSON objects or free text. JSON keys map directly onto event
//! fields; free text is mined for a timestamp and a severity keyword.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Utc;
use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use siphon_protocol::{LogEvent, RawData, Severity, SourceKind, parse_timestamp};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info, warn};

use crate::config::{CategoryFilter, FileSourceConfig};
use crate::error::ConnectorError;
use crate::traits::{FetchWindow, Source};


static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?)")
        .expect("TIMESTAMP_RE is a valid regex pattern")
});

static SEVERITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(ERROR|WARN|INFO|DEBUG|CRITICAL)")
        .expect("SEVERITY_RE is a valid regex pattern")
});

/// Category assigned to free-text lines
const TEXT_CATEGORY: &str = "system";

/// Local file tailing source
pub struct FileSource {
    name: String,
    path: Option<PathBuf>,
    filter: CategoryFilter,
    offset: Mutex<u64>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, config: FileSourceConfig) -> Self {
        let name = name.into();
        let offset = match (&config.path, config.start_at_end) {
            (Some(path), true) => match std::fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    warn!(source = %name, error = %e, "cannot stat file, reading from start");
                    0
                }
            },
            _ => 0,
        };

        Self {
            filter: config.category_filter(),
            path: config.path,
            name,
            offset: Mutex::new(offset),
        }
    }

    /// Byte offset of the next unread line
    pub fn offset(&self) -> u64 {
        *self.offset.lock()
    }

    fn path(&self) -> Result<&Path, ConnectorError> {
        self.path
            .as_deref()
            .ok_or_else(|| ConnectorError::ConfigError("file source has no path".into()))
    }

    /// Read every complete line past the stored offset
    async fn read_new_lines(&self, path: &Path) -> Result<Vec<u8>, ConnectorError> {
        let mut file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();

        let mut offset = self.offset();
        if len < offset {
            info!(
                source = %self.name,
                previous_offset = offset,
                size = len,
                "file shrank, reading from the beginning"
            );
            offset = 0;
        }
        if len == offset {
            *self.offset.lock() = offset;
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(offset)).await?;
        let mut buf = Vec::new();
        file.take(len - offset).read_to_end(&mut buf).await?;

        let complete = buf.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        buf.truncate(complete);
        *self.offset.lock() = offset + complete as u64;

        Ok(buf)
    }
}

impl Source for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn validate(&self) -> bool {
        self.path.as_deref().is_some_and(Path::is_file)
    }

    async fn fetch(&self, _window: FetchWindow) -> Result<Vec<LogEvent>, ConnectorError> {
        let path = self.path()?;
        let buf = self.read_new_lines(path).await?;
        if buf.is_empty() {
            return Ok(Vec::new());
        }

        let text = String::from_utf8_lossy(&buf);
        let mut events = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Ok(event) if self.filter.allows(event.category()) => events.push(event),
                Ok(_) => {}
                Err(e) => warn!(source = %self.name, error = %e, "skipping log line"),
            }
        }

        debug!(
            source = %self.name,
            bytes = buf.len(),
            events = events.len(),
            offset = self.offset(),
            "file fetch complete"
        );
        Ok(events)
    }
}

/// Parse one trimmed, non-empty line
fn parse_line(line: &str) -> Result<LogEvent, ConnectorError> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(obj)) => event_from_json(obj),
        Ok(_) => Err(ConnectorError::malformed("JSON line is not an object")),
        Err(_) => Ok(event_from_text(line)),
    }
}

fn event_from_json(obj: RawData) -> Result<LogEvent, ConnectorError> {
    let timestamp = match obj.get("timestamp") {
        None | Some(Value::Null) => Utc::now(),
        Some(Value::String(s)) => {
            parse_timestamp(s).map_err(|e| ConnectorError::malformed(e.to_string()))?
        }
        Some(other) => {
            return Err(ConnectorError::malformed(format!(
                "timestamp is not a string: {other}"
            )));
        }
    };

    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
    let category = text("category").unwrap_or_else(|| "unknown".to_string());
    let message = text("message").unwrap_or_default();
    let user = text("user");
    let ip_address = text("ip_address");
    let event_id = match obj.get("event_id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let severity = obj
        .get("severity")
        .and_then(Value::as_str)
        .map(Severity::normalize)
        .unwrap_or_default();

    Ok(LogEvent::builder(SourceKind::File)
        .timestamp(timestamp)
        .category(category)
        .severity(severity)
        .message(message)
        .event_id(event_id)
        .user(user)
        .ip_address(ip_address)
        .raw_data(obj)
        .build())
}

fn event_from_text(line: &str) -> LogEvent {
    let timestamp = TIMESTAMP_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_timestamp(m.as_str()).ok())
        .unwrap_or_else(Utc::now);

    let severity = SEVERITY_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| Severity::normalize(m.as_str()))
        .unwrap_or_default();

    let mut raw = RawData::new();
    raw.insert("raw_line".to_string(), Value::String(line.to_string()));

    LogEvent::builder(SourceKind::File)
        .timestamp(timestamp)
        .category(TEXT_CATEGORY)
        .severity(severity)
        .message(line)
        .raw_data(raw)
        .build()
}
