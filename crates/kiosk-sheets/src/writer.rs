//! Write commands against the relay endpoint.
//!
//! The relay mutates the store on our behalf; a command names the action,
//! the target table region, the working header list, and the data rows.
//! `assign`/`delete` additionally carry match columns/values identifying
//! the rows to target.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SheetsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    Append,
    Replace,
    Assign,
    Delete,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteCommand {
    pub action: WriteAction,
    pub sheet_id: String,
    pub gid: u64,
    pub headers: Vec<String>,
    #[serde(rename = "data")]
    pub rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_values: Option<Vec<String>>,
}

impl WriteCommand {
    /// An append command adding `rows` under `headers` to one region.
    #[must_use]
    pub fn append(sheet_id: &str, gid: u64, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            action: WriteAction::Append,
            sheet_id: sheet_id.to_owned(),
            gid,
            headers,
            rows,
            match_columns: None,
            match_values: None,
        }
    }
}

/// How much of the relay's response is observable.
///
/// `Verifiable` is the trusted same-origin channel: the response body is
/// readable and parsed. `Opaque` is the cross-origin fallback: the response
/// cannot be read, so a dispatch that completes without a transport error is
/// optimistically reported as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Verifiable,
    Opaque,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for submitting write commands to the relay endpoint.
pub struct ScriptClient {
    client: Client,
    endpoint: Url,
    mode: WriteMode,
}

impl ScriptClient {
    /// Creates a relay client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidUrl`] if `endpoint`
    /// does not parse.
    pub fn new(endpoint: &str, timeout_secs: u64, mode: WriteMode) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("kiosk/0.1 (coupon-issuance)")
            .build()?;
        let endpoint = Url::parse(endpoint).map_err(|e| SheetsError::InvalidUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            endpoint,
            mode,
        })
    }

    /// Submits one write command.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::InvalidCommand`] when a non-delete command has no
    ///   headers or no rows; nothing is sent.
    /// - [`SheetsError::Http`] on transport failure (both modes) or a
    ///   non-2xx status (verifiable mode).
    /// - [`SheetsError::WriteRejected`] when the relay reports failure.
    /// - [`SheetsError::Deserialize`] when a verifiable response body is
    ///   not the expected shape.
    pub async fn submit(&self, command: &WriteCommand) -> Result<(), SheetsError> {
        if command.action != WriteAction::Delete
            && (command.headers.is_empty() || command.rows.is_empty())
        {
            return Err(SheetsError::InvalidCommand(
                "non-delete command requires headers and at least one row",
            ));
        }

        let request_id = Uuid::new_v4();
        tracing::debug!(
            %request_id,
            action = ?command.action,
            gid = command.gid,
            rows = command.rows.len(),
            mode = ?self.mode,
            "submitting write command"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(command)
            .send()
            .await?;

        match self.mode {
            WriteMode::Opaque => {
                // Response unreadable by contract: reaching the relay at all
                // is the only observable signal.
                tracing::debug!(%request_id, "write dispatched (opaque mode)");
                Ok(())
            }
            WriteMode::Verifiable => {
                let response = response.error_for_status()?;
                let body = response.text().await?;
                let parsed: RelayResponse =
                    serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                        context: self.endpoint.to_string(),
                        source: e,
                    })?;
                if parsed.success {
                    tracing::debug!(%request_id, "write confirmed by relay");
                    Ok(())
                } else {
                    Err(SheetsError::WriteRejected(
                        parsed.error.unwrap_or_else(|| "unknown write error".into()),
                    ))
                }
            }
        }
    }
}
