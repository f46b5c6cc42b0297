//! Feed timestamp handling.
//!
//! GBFS timestamps are POSIX seconds. Feeds send them as JSON numbers that
//! are sometimes fractional, so they are carried as `f64` and only turned
//! into calendar time when a caller asks for it.

use chrono::{DateTime, Utc};

/// Interpret a feed timestamp as Unix seconds.
///
/// Returns `None` for non-finite or out-of-range values. Sub-second parts
/// are kept to nanosecond precision.
///
/// # Examples
///
/// ```
/// use bikeshare_status::domain::unix_seconds_to_utc;
///
/// let t = unix_seconds_to_utc(1_700_000_000.0).unwrap();
/// assert_eq!(t.to_rfc3339(), "2023-11-14T22:13:20+00:00");
///
/// assert!(unix_seconds_to_utc(f64::NAN).is_none());
/// ```
pub fn unix_seconds_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }

    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }

    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    // Rounding can carry into the next second
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole as i64 + 1, 0)
    } else {
        (whole as i64, nanos)
    };

    DateTime::from_timestamp(whole, nanos)
}
