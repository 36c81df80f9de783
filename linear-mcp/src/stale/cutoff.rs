//! Staleness cutoff arithmetic

use chrono::{DateTime, Months, Utc};

/// Months of inactivity after which a project counts as stale
pub const DEFAULT_STALENESS_MONTHS: i32 = 6;

/// Move `now` back by `months` calendar months.
///
/// The day of month is clamped to the length of the target month, so
/// Mar 31 minus one month is the last day of February. Time of day is kept.
/// Negative `months` move forward. Results that leave chrono's range saturate
/// at the range bound.
pub fn staleness_cutoff(now: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    let span = Months::new(months.unsigned_abs());
    if months >= 0 {
        now.checked_sub_months(span)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    } else {
        now.checked_add_months(span)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Date-only rendering of a cutoff, as reported in summaries
pub fn cutoff_date_string(cutoff: DateTime<Utc>) -> String {
    cutoff.format("%Y-%m-%d").to_string()
}
