//! Reads against the registrations and master-list regions.
//!
//! Two read-failure policies live here deliberately side by side: the
//! master-list existence check fails closed (an unverifiable code is
//! rejected), while the duplicate checks fail open (a read failure risks a
//! rare duplicate rather than blocking every registration). Do not unify
//! them; the asymmetry is observable behavior.

use kiosk_sheets::headers::resolve_header;
use kiosk_sheets::{SheetsClient, Snapshot};

/// Canonical registration headers, in write order.
pub const REGISTRATION_HEADERS: [&str; 6] = [
    "QR Code",
    "Mobile",
    "Name",
    "Status",
    "OfferType",
    "RegisteredDate",
];

/// Literal column labels of a registrations snapshot, resolved once per read.
#[derive(Debug, Clone)]
pub struct RegistrationColumns {
    pub qr: String,
    pub mobile: String,
    pub name: String,
    pub status: String,
    pub offer_type: String,
    pub registered_date: String,
}

impl RegistrationColumns {
    /// Resolves the registration schema against a snapshot's labels. On an
    /// empty table (or drifted headers) each column falls back to its
    /// canonical label; fallbacks are logged, not silent.
    #[must_use]
    pub fn resolve(columns: &[String]) -> Self {
        let resolve = |canonical: &str| {
            resolve_header(columns, canonical).unwrap_or_else(|| {
                if !columns.is_empty() {
                    tracing::warn!(
                        canonical,
                        "registration column not found; using canonical label"
                    );
                }
                canonical.to_owned()
            })
        };
        Self {
            qr: resolve("QR Code"),
            mobile: resolve("Mobile"),
            name: resolve("Name"),
            status: resolve("Status"),
            offer_type: resolve("OfferType"),
            registered_date: resolve("RegisteredDate"),
        }
    }

    /// The header list to write, in canonical order.
    #[must_use]
    pub fn write_headers(&self) -> Vec<String> {
        vec![
            self.qr.clone(),
            self.mobile.clone(),
            self.name.clone(),
            self.status.clone(),
            self.offer_type.clone(),
            self.registered_date.clone(),
        ]
    }
}

/// Diagnostic detail about an existing registration row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Name plus counterpart identifier from the matching row. Logged for
    /// diagnostics, never shown to the customer.
    pub registered_to: String,
}

/// Scans a registrations snapshot for a row holding `code`.
#[must_use]
pub fn find_code_assignment(snapshot: &Snapshot, code: &str) -> Option<Assignment> {
    let cols = RegistrationColumns::resolve(&snapshot.columns);
    let code = code.trim();
    snapshot.rows.iter().find_map(|row| {
        let get = |label: &String| row.get(label).map(String::as_str).unwrap_or("").trim();
        (get(&cols.qr) == code).then(|| Assignment {
            registered_to: format!("{} {}", get(&cols.name), get(&cols.mobile))
                .trim()
                .to_owned(),
        })
    })
}

/// Scans a registrations snapshot for a row holding `mobile`.
#[must_use]
pub fn find_mobile_assignment(snapshot: &Snapshot, mobile: &str) -> Option<Assignment> {
    let cols = RegistrationColumns::resolve(&snapshot.columns);
    let mobile = mobile.trim();
    snapshot.rows.iter().find_map(|row| {
        let get = |label: &String| row.get(label).map(String::as_str).unwrap_or("").trim();
        (get(&cols.mobile) == mobile).then(|| Assignment {
            registered_to: format!("{} {}", get(&cols.name), get(&cols.qr))
                .trim()
                .to_owned(),
        })
    })
}

/// Whether `code` already has a registration row. Fail-open: a read failure
/// reports "not assigned" and is logged.
pub async fn code_assignment(
    client: &SheetsClient,
    sheet_id: &str,
    gid: u64,
    code: &str,
) -> Option<Assignment> {
    match client.fetch_snapshot(sheet_id, gid).await {
        Ok(snapshot) => find_code_assignment(&snapshot, code),
        Err(e) => {
            tracing::warn!(gid, error = %e, "duplicate-code check unreadable; treating as unassigned");
            None
        }
    }
}

/// Whether `mobile` already has a registration row. Fail-open like
/// [`code_assignment`].
pub async fn mobile_assignment(
    client: &SheetsClient,
    sheet_id: &str,
    gid: u64,
    mobile: &str,
) -> Option<Assignment> {
    match client.fetch_snapshot(sheet_id, gid).await {
        Ok(snapshot) => find_mobile_assignment(&snapshot, mobile),
        Err(e) => {
            tracing::warn!(gid, error = %e, "duplicate-mobile check unreadable; treating as unassigned");
            None
        }
    }
}

/// Whether `code` appears in the master allow-list. Fail-closed: a read
/// failure rejects the code rather than accepting one that cannot be
/// verified.
pub async fn code_exists(client: &SheetsClient, sheet_id: &str, gid: u64, code: &str) -> bool {
    match client.fetch_snapshot(sheet_id, gid).await {
        Ok(snapshot) => {
            let qr = resolve_header(&snapshot.columns, "QR Code")
                .unwrap_or_else(|| "QR Code".to_owned());
            let code = code.trim();
            let exists = snapshot
                .rows
                .iter()
                .any(|row| row.get(&qr).map(String::as_str).unwrap_or("").trim() == code);
            tracing::debug!(code, exists, total = snapshot.rows.len(), "master list lookup");
            exists
        }
        Err(e) => {
            tracing::warn!(gid, error = %e, "master list unreadable; rejecting code");
            false
        }
    }
}
