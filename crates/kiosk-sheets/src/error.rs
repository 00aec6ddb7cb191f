use thiserror::Error;

/// Errors surfaced by snapshot reads and write-command submissions.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The snapshot request exceeded the configured read timeout.
    #[error("timed out loading sheet region gid {gid}")]
    Timeout { gid: u64 },

    /// The given base or endpoint URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The response body did not carry the expected callback envelope.
    #[error("unexpected response envelope for {context}")]
    Envelope { context: String },

    /// The envelope payload could not be deserialized.
    #[error("json deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store answered the query with an error status.
    #[error("sheet provider error: {0}")]
    Provider(String),

    /// The write command failed client-side validation; no request was sent.
    #[error("invalid write command: {0}")]
    InvalidCommand(&'static str),

    /// The relay processed the command and reported failure.
    #[error("write rejected: {0}")]
    WriteRejected(String),
}
