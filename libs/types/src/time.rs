//! Time arithmetic for the bond lock
//!
//! Timestamps are Unix seconds (`i64`), matching what the execution
//! environment's clock reports.

/// Unix timestamp in seconds
pub type Timestamp = i64;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Fixed lock period applied at construction: 365 days.
pub const LOCK_DURATION_SECS: i64 = 365 * SECONDS_PER_DAY;

/// Render a duration in seconds as `"{d}d {h}h {m}m {s}s"`.
///
/// Negative input renders as zero.
pub fn format_duration(seconds: i64) -> String {
    let total = seconds.max(0);
    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;
    format!("{}d {}h {}m {}s", days, hours, minutes, secs)
}
