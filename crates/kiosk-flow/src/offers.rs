//! Offer eligibility resolution.
//!
//! The offers region is scanned in table order and the first row whose code
//! set contains the queried code decides the outcome. The source table is
//! not constrained to keep a code in a single row; first match wins and no
//! "better" match is sought.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use kiosk_core::dates::{parse_day_month_year, within_offer_window};
use kiosk_sheets::headers::{resolve_any, resolve_header};
use kiosk_sheets::{SheetsClient, Snapshot};

use crate::error::RegistrationError;

/// One row of the offers region.
#[derive(Debug, Clone)]
pub struct OfferRecord {
    pub offer_type: String,
    pub status: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub codes: HashSet<String>,
}

struct OfferColumns {
    offer_type: String,
    status: String,
    start: String,
    end: String,
    codes: String,
}

impl OfferColumns {
    /// Resolves the offer schema once per snapshot. A column that cannot be
    /// found falls back to its canonical name and is logged; lookups through
    /// the fallback then read as empty cells.
    fn resolve(columns: &[String]) -> Self {
        let resolve = |canonical: &str| {
            resolve_header(columns, canonical).unwrap_or_else(|| {
                tracing::warn!(canonical, "offer column not found; using canonical label");
                canonical.to_owned()
            })
        };
        let codes = resolve_any(columns, &["Qr Codes", "Qr Code", "QR"]).unwrap_or_else(|| {
            tracing::warn!("offer codes column not found; using canonical label");
            "Qr Codes".to_owned()
        });
        Self {
            offer_type: resolve("Type"),
            status: resolve("Status"),
            start: resolve("Start Date"),
            end: resolve("End Date"),
            codes,
        }
    }
}

/// Splits a delimiter-separated codes cell on commas and stray newlines.
#[must_use]
pub fn split_codes(cell: &str) -> Vec<String> {
    cell.split(['\n', '\r', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parses an offers snapshot into records, preserving table order.
#[must_use]
pub fn parse_offers(snapshot: &Snapshot) -> Vec<OfferRecord> {
    let cols = OfferColumns::resolve(&snapshot.columns);
    snapshot
        .rows
        .iter()
        .map(|row| {
            let get = |label: &String| row.get(label).map(String::as_str).unwrap_or("");
            OfferRecord {
                offer_type: get(&cols.offer_type).trim().to_owned(),
                status: get(&cols.status).trim().to_owned(),
                start: parse_day_month_year(get(&cols.start)),
                end: parse_day_month_year(get(&cols.end)),
                codes: split_codes(get(&cols.codes)).into_iter().collect(),
            }
        })
        .collect()
}

/// Decides eligibility for `code` at `now` over `offers` in table order.
///
/// # Errors
///
/// - [`RegistrationError::OfferNotActive`] when the first matching row's
///   status is not `"active"` (case-insensitive).
/// - [`RegistrationError::OfferOutOfDate`] when `now` is outside the row's
///   validity window (end day inclusive).
/// - [`RegistrationError::OfferNotMapped`] when no row's code set contains
///   the code.
pub fn decide_offer(
    offers: &[OfferRecord],
    code: &str,
    now: DateTime<Utc>,
) -> Result<String, RegistrationError> {
    let code = code.trim();
    for offer in offers {
        if !offer.codes.contains(code) {
            continue;
        }
        if !offer.status.eq_ignore_ascii_case("active") {
            return Err(RegistrationError::OfferNotActive);
        }
        if !within_offer_window(now, offer.start, offer.end) {
            return Err(RegistrationError::OfferOutOfDate);
        }
        return Ok(offer.offer_type.clone());
    }
    Err(RegistrationError::OfferNotMapped)
}

/// Reads the offers region and resolves eligibility for `code`.
///
/// # Errors
///
/// [`RegistrationError::OffersUnreadable`] when the snapshot read fails,
/// plus the eligibility failures of [`decide_offer`].
pub async fn resolve_offer(
    client: &SheetsClient,
    sheet_id: &str,
    gid: u64,
    code: &str,
) -> Result<String, RegistrationError> {
    let snapshot = client
        .fetch_snapshot(sheet_id, gid)
        .await
        .map_err(RegistrationError::OffersUnreadable)?;
    let offers = parse_offers(&snapshot);
    tracing::debug!(code, offers = offers.len(), "resolving offer eligibility");
    decide_offer(&offers, code, Utc::now())
}
