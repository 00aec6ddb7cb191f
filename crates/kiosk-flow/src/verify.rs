//! Post-write visibility confirmation.
//!
//! The store's reads lag its writes. After a reported write success the
//! registrations region is re-polled with a bounded, increasing delay; if
//! no attempt observes the row the write is ambiguous and the caller must
//! not resubmit, since a duplicate row costs more than a manual check.

use std::time::Duration;

use kiosk_sheets::SheetsClient;

use crate::registry::code_assignment;

/// Polls for the written row up to `attempts` times, sleeping
/// `base_delay * (attempt + 1)` before each check. Returns whether any
/// attempt observed the row.
pub async fn confirm_visibility(
    client: &SheetsClient,
    sheet_id: &str,
    gid: u64,
    code: &str,
    attempts: u32,
    base_delay: Duration,
) -> bool {
    for attempt in 0..attempts {
        tokio::time::sleep(base_delay + base_delay * attempt).await;
        if code_assignment(client, sheet_id, gid, code).await.is_some() {
            tracing::debug!(attempt, code, "written row is visible");
            return true;
        }
        tracing::debug!(attempt, code, "written row not yet visible");
    }
    tracing::warn!(code, attempts, "write visibility unconfirmed after all attempts");
    false
}
