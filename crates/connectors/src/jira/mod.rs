//! Jira audit log source
//!
//! Pulls `/rest/api/3/auditing/record` incrementally. Each cycle:
//!
//! 1. Resolves the window: `end` defaults to now, `start` to the checkpoint,
//!    or five hours before `end` on first run.
//! 2. Opens an authenticated HTTP session for this cycle only.
//! 3. Walks pages via `nextPage`, backing off on rate limits and transient
//!    transport failures.
//! 4. Advances and persists the checkpoint when at least one record came back.
//!
//! Retrieval failures never surface as errors: they are logged and the
//! records gathered so far are returned.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use siphon_protocol::{LogEvent, Severity, SourceKind, parse_timestamp};
use tracing::{debug, error, info, warn};

use crate::checkpoint::CheckpointStore;
use crate::config::{CategoryFilter, JiraSourceConfig};
use crate::error::ConnectorError;
use crate::resilience::{ResilienceConfig, Sleeper, TokioSleeper, parse_retry_after};
use crate::traits::{FetchWindow, Source};


/// Lookback used when no checkpoint exists
const INITIAL_LOOKBACK: TimeDelta = TimeDelta::hours(5);

const AUDIT_RECORDS_PATH: &str = "/rest/api/3/auditing/record";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RETRY_AFTER: &str = "retry-after";

const USER_AGENT: &str = concat!("siphon/", env!("CARGO_PKG_VERSION"));

/// One page of the audit records API
#[derive(Debug, Deserialize)]
struct AuditPage {
    #[serde(default)]
    records: Vec<Value>,
    #[serde(rename = "nextPage")]
    next_page: Option<String>,
}

/// Jira audit log source
pub struct JiraSource {
    name: String,
    config: JiraSourceConfig,
    filter: CategoryFilter,
    resilience: ResilienceConfig,
    store: Arc<dyn CheckpointStore>,
    sleeper: Arc<dyn Sleeper>,
    checkpoint: Mutex<Option<DateTime<Utc>>>,
}

impl JiraSource {
    /// Create a source, loading its checkpoint from `store`
    pub fn new(
        name: impl Into<String>,
        config: JiraSourceConfig,
        store: Arc<dyn CheckpointStore>,
    ) -> Self {
        let name = name.into();
        let checkpoint = match store.get(&name) {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                warn!(source = %name, error = %e, "failed to load checkpoint, starting fresh");
                None
            }
        };

        Self {
            filter: config.category_filter(),
            resilience: config.resilience_config(),
            name,
            config,
            store,
            sleeper: Arc::new(TokioSleeper),
            checkpoint: Mutex::new(checkpoint),
        }
    }

    /// Replace the sleeper used between retries
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Current in-memory checkpoint
    pub fn checkpoint(&self) -> Option<DateTime<Utc>> {
        *self.checkpoint.lock()
    }

    fn records_url(&self) -> String {
        format!(
            "{}{}",
            self.config.api_url.trim_end_matches('/'),
            AUDIT_RECORDS_PATH
        )
    }

    /// Build the HTTP session for one cycle
    fn open_session(&self) -> Result<Session<'_>, ConnectorError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(self.resilience.timeout())
            .build()
            .map_err(|e| ConnectorError::Init(format!("jira HTTP client: {e}")))?;

        Ok(Session {
            client,
            username: &self.config.username,
            api_token: &self.config.api_token,
        })
    }

    /// GET one page, retrying on rate limits and transient failures
    ///
    /// `None` means the remaining pages should be abandoned.
    async fn request_page(
        &self,
        session: &Session<'_>,
        url: &str,
        params: &[(&str, String)],
    ) -> Option<AuditPage> {
        let max_attempts = self.resilience.max_attempts();

        for attempt in 0..max_attempts {
            let wait = match session.get(url, params).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return match resp.json::<AuditPage>().await {
                        Ok(page) => Some(page),
                        Err(e) => {
                            error!(source = %self.name, error = %e, "undecodable jira response");
                            None
                        }
                    };
                }
                Ok(resp) if is_rate_limited(resp.status(), resp.headers()) => {
                    let retry_after = resp
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(parse_retry_after);
                    let wait = self.resilience.backoff_delay(attempt, retry_after);
                    warn!(
                        source = %self.name,
                        status = resp.status().as_u16(),
                        retry = attempt,
                        max_retries = self.resilience.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        "rate limited by jira"
                    );
                    wait
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    error!(
                        source = %self.name,
                        status = status.as_u16(),
                        body = %truncate(&body, 512),
                        "jira request failed"
                    );
                    return None;
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    let wait = self.resilience.backoff_delay(attempt, None);
                    warn!(
                        source = %self.name,
                        error = %e,
                        retry = attempt,
                        wait_ms = wait.as_millis() as u64,
                        "transient jira failure"
                    );
                    wait
                }
                Err(e) => {
                    error!(source = %self.name, error = %e, "jira request failed");
                    return None;
                }
            };

            if attempt + 1 < max_attempts {
                self.sleeper.sleep(wait).await;
            }
        }

        error!(
            source = %self.name,
            attempts = max_attempts,
            "exceeded max retries while fetching jira audit records"
        );
        None
    }

    /// Map a page of records, skipping malformed and filtered ones
    ///
    /// Returns the number of well-formed records, filtered or not.
    fn collect_records(&self, records: &[Value], out: &mut Vec<LogEvent>) -> usize {
        let mut retrieved = 0;
        for record in records {
            match parse_record(record) {
                Ok(event) => {
                    retrieved += 1;
                    if self.filter.allows(event.category()) {
                        out.push(event);
                    }
                }
                Err(e) => warn!(source = %self.name, error = %e, "skipping jira record"),
            }
        }
        retrieved
    }

    /// Persist `end` as the new checkpoint, never moving backwards
    ///
    /// The in-memory value only advances once the store accepted it.
    fn advance_checkpoint(&self, end: DateTime<Utc>) {
        let next = match self.checkpoint() {
            Some(prior) => prior.max(end),
            None => end,
        };

        match self.store.set(&self.name, next) {
            Ok(()) => {
                *self.checkpoint.lock() = Some(next);
                debug!(source = %self.name, checkpoint = %next, "checkpoint advanced");
            }
            Err(e) => {
                warn!(
                    source = %self.name,
                    error = %e,
                    "failed to persist checkpoint, window will be fetched again"
                );
            }
        }
    }
}

impl Source for JiraSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Jira
    }

    fn validate(&self) -> bool {
        let config = &self.config;
        if config.api_url.trim().is_empty()
            || config.username.trim().is_empty()
            || config.api_token.trim().is_empty()
        {
            return false;
        }
        reqwest::Url::parse(&self.records_url()).is_ok()
    }

    async fn fetch(&self, window: FetchWindow) -> Result<Vec<LogEvent>, ConnectorError> {
        let end = window.end.unwrap_or_else(Utc::now);
        let start = match window.start.or_else(|| self.checkpoint()) {
            Some(start) => start,
            None => {
                info!(source = %self.name, "no checkpoint, fetching the last 5 hours");
                end - INITIAL_LOOKBACK
            }
        };

        debug!(source = %self.name, from = %start, to = %end, "fetching jira audit records");

        let session = self.open_session()?;

        let mut url = self.records_url();
        let mut params = vec![
            ("maxResults", self.config.effective_page_size().to_string()),
            ("from", format_query_time(start)),
            ("to", format_query_time(end)),
            ("orderBy", "created".to_string()),
            ("order", "desc".to_string()),
        ];
        let mut events = Vec::new();
        let mut retrieved = 0usize;
        let mut pages = 0u32;

        while let Some(page) = self.request_page(&session, &url, &params).await {
            pages += 1;
            retrieved += self.collect_records(&page.records, &mut events);

            match page.next_page {
                Some(next) if !next.is_empty() => {
                    url = next;
                    params.clear();
                }
                _ => break,
            }
        }

        drop(session);

        if retrieved > 0 {
            self.advance_checkpoint(end);
        }

        info!(
            source = %self.name,
            pages,
            retrieved,
            events = events.len(),
            "jira fetch complete"
        );
        Ok(events)
    }
}

/// Authenticated HTTP session for a single fetch cycle
struct Session<'a> {
    client: reqwest::Client,
    username: &'a str,
    api_token: &'a str,
}

impl Session<'_> {
    fn get(&self, url: &str, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .basic_auth(self.username, Some(self.api_token));
        if !params.is_empty() {
            request = request.query(params);
        }
        request
    }
}

/// 429, or any other failure that reports an exhausted quota
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || headers
            .get(RATE_LIMIT_REMAINING)
            .is_some_and(|v| v.as_bytes() == b"0")
}

fn format_query_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Severity implied by a Jira audit category
pub fn severity_for_category(category: &str) -> Severity {
    if category.eq_ignore_ascii_case("SECURITY") {
        Severity::Critical
    } else if category.eq_ignore_ascii_case("ADMIN") {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Map one audit record to an event
fn parse_record(record: &Value) -> Result<LogEvent, ConnectorError> {
    let obj = record
        .as_object()
        .ok_or_else(|| ConnectorError::malformed("record is not an object"))?;

    let created = obj
        .get("created")
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectorError::malformed("record has no 'created' timestamp"))?;
    let timestamp =
        parse_timestamp(created).map_err(|e| ConnectorError::malformed(e.to_string()))?;

    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    let event_id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let user = obj
        .get("author")
        .and_then(|a| a.get("displayName"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let ip_address = obj
        .get("remoteAddress")
        .and_then(Value::as_str)
        .map(str::to_string);

    let message = obj.get("summary").and_then(Value::as_str).unwrap_or("");

    Ok(LogEvent::builder(SourceKind::Jira)
        .timestamp(timestamp)
        .category(category)
        .severity(severity_for_category(category))
        .message(message)
        .event_id(event_id)
        .user(user)
        .ip_address(ip_address)
        .raw_data(obj.clone())
        .build())
}
