//! Client for the remote spreadsheet store.
//!
//! Reads are point-in-time snapshots of one table region via the gviz JSON
//! endpoint; writes go through a relay endpoint that accepts append/replace/
//! assign/delete commands. Nothing is cached between calls: every read
//! re-fetches the region, so callers always see the store's current (if
//! loosely consistent) state.

pub mod client;
pub mod error;
pub mod headers;
pub mod snapshot;
pub mod writer;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use headers::resolve_header;
pub use snapshot::{Row, Snapshot};
pub use writer::{ScriptClient, WriteAction, WriteCommand, WriteMode};
