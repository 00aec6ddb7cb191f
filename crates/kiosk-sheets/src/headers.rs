//! Tolerant column-label resolution.
//!
//! Sheets maintained by hand drift: `"QR Code"`, `"QR_Code"`, `"QrCode "`
//! all mean the same column. Resolution compares labels with whitespace
//! removed and case folded, then tries a small set of canonical variants.

fn norm(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the literal label in `labels` that matches `canonical`, tolerating
/// case, surrounding whitespace, and space/underscore joining. Returns `None`
/// when nothing matches; callers decide the fallback.
#[must_use]
pub fn resolve_header(labels: &[String], canonical: &str) -> Option<String> {
    let target = norm(canonical);
    for label in labels {
        if norm(label) == target {
            return Some(label.clone());
        }
    }

    let underscored = canonical.split_whitespace().collect::<Vec<_>>().join("_");
    let variants = [canonical.replace(' ', ""), underscored];
    for variant in &variants {
        let vt = norm(variant);
        for label in labels {
            if norm(label) == vt {
                return Some(label.clone());
            }
        }
    }
    None
}

/// Resolves `canonical` against each candidate name in order, returning the
/// first hit. Used for columns with historical aliases (`"Qr Codes"`, `"QR"`).
#[must_use]
pub fn resolve_any(labels: &[String], candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|name| resolve_header(labels, name))
}
