//! Day-first date parsing and the offer validity window.
//!
//! Offer sheets carry dates as `D-M-YYYY` or `D/M/YYYY`, sometimes with
//! 2-digit years. A malformed date is `None` and leaves that side of the
//! window unbounded rather than rejecting the row.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

/// Parses a day-first date string (`31-12-2024`, `1/2/25`, `31-12-24`).
///
/// 2-digit years are normalized by adding 2000. Returns `None` for anything
/// that does not match the shape or is not a real calendar date.
#[must_use]
pub fn parse_day_month_year(value: &str) -> Option<NaiveDate> {
    let re = Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/]?(\d{2,4})$").expect("valid date regex");
    let caps = re.captures(value.trim())?;

    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let mut year: i32 = caps.get(3)?.as_str().parse().ok()?;
    if year < 100 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Returns whether `now` falls inside `[start, end]`, inclusive of the whole
/// end day: true through the end day's last millisecond, false from the next
/// midnight on. A `None` bound is unbounded on that side.
#[must_use]
pub fn within_offer_window(
    now: DateTime<Utc>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    let after_start = start.is_none_or(|s| now >= s.and_time(NaiveTime::MIN).and_utc());
    let before_end = end.is_none_or(|e| match e.succ_opt() {
        Some(next_day) => now < next_day.and_time(NaiveTime::MIN).and_utc(),
        // End of the calendar; nothing lies past it.
        None => true,
    });
    after_start && before_end
}
