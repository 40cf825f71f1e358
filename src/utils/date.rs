//! UTC datetime helpers for feed timestamps.
//!
//! The store keeps timestamps as Unix seconds; feeds want RFC 2822.
//!
//! # Examples
//!
//! ```ignore
//! let dt = from_unix(1_718_461_845)?;
//! assert_eq!(to_rfc2822(dt), "Sat, 15 Jun 2024 14:30:45 +0000");
//! ```

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// Current time truncated to whole seconds (the store's precision).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Convert stored Unix seconds into a UTC datetime.
pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Format as RFC 2822 for RSS `pubDate`.
pub fn to_rfc2822(dt: DateTime<Utc>) -> String {
    dt.to_rfc2822()
}

/// Parse a user-supplied timestamp.
///
/// Accepts RFC 3339 (`2024-06-15T14:30:45Z`), `YYYY-MM-DD HH:MM:SS`
/// (interpreted as UTC) or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(naive.and_utc());
    }

    Err(anyhow!("invalid timestamp `{s}`, expected YYYY-MM-DD[ HH:MM:SS] or RFC 3339"))
}
