//! Snapshot reads over the gviz JSON endpoint.
//!
//! The endpoint answers with a JavaScript callback envelope
//! (`google.visualization.Query.setResponse({...});`) rather than bare
//! JSON. Each read here is an ordinary correlated HTTP request: the
//! envelope is stripped and parsed in-process, and the connection is
//! released on every exit path.

use std::time::Duration;

use reqwest::{Client, Url};
use uuid::Uuid;

use crate::error::SheetsError;
use crate::snapshot::{GvizResponse, Snapshot};

const DEFAULT_BASE_URL: &str = "https://docs.google.com/";

/// Client for reading table-region snapshots.
///
/// Use [`SheetsClient::new`] for production or
/// [`SheetsClient::with_base_url`] to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
}

impl SheetsClient {
    /// Creates a client pointed at the production store.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("kiosk/0.1 (coupon-issuance)")
            .build()?;

        // Normalise: exactly one trailing slash so joins append to the root
        // path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SheetsError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches a point-in-time snapshot of one table region.
    ///
    /// An empty region is `Ok` with zero rows; a failed fetch is an error.
    /// Nothing is cached: repeated calls observe the store's current state.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Timeout`] when the read timeout elapses.
    /// - [`SheetsError::Http`] on network failure or non-2xx status.
    /// - [`SheetsError::Envelope`] when the callback wrapper is missing.
    /// - [`SheetsError::Deserialize`] when the payload is not the expected
    ///   shape.
    /// - [`SheetsError::Provider`] when the store reports a query error.
    pub async fn fetch_snapshot(&self, sheet_id: &str, gid: u64) -> Result<Snapshot, SheetsError> {
        let url = self.snapshot_url(sheet_id, gid)?;
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, sheet_id, gid, "loading sheet snapshot");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::map_transport(e, gid))?;
        let response = response.error_for_status()?;
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_transport(e, gid))?;

        let payload = strip_envelope(&body).ok_or_else(|| SheetsError::Envelope {
            context: url.to_string(),
        })?;
        let parsed: GvizResponse =
            serde_json::from_str(payload).map_err(|e| SheetsError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if parsed.status.as_deref() == Some("error") {
            let detail = parsed
                .errors
                .first()
                .map_or("unknown provider error", |e| e.text())
                .to_owned();
            return Err(SheetsError::Provider(detail));
        }

        let snapshot = Snapshot::from_table(parsed.table);
        tracing::debug!(
            %request_id,
            gid,
            columns = snapshot.columns.len(),
            rows = snapshot.rows.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    fn snapshot_url(&self, sheet_id: &str, gid: u64) -> Result<Url, SheetsError> {
        let path = format!("spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:json;headers=1&gid={gid}");
        self.base_url
            .join(&path)
            .map_err(|e| SheetsError::InvalidUrl {
                url: path,
                reason: e.to_string(),
            })
    }

    fn map_transport(err: reqwest::Error, gid: u64) -> SheetsError {
        if err.is_timeout() {
            SheetsError::Timeout { gid }
        } else {
            SheetsError::Http(err)
        }
    }
}

/// Extracts the JSON payload from the callback envelope. A bare JSON body is
/// accepted as-is.
fn strip_envelope(body: &str) -> Option<&str> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    let start = body.find('(')?;
    let end = body.rfind(')')?;
    if end <= start {
        return None;
    }
    Some(&body[start + 1..end])
}
