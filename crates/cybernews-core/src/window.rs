//! Parsing of the trailing time window (`24h`, `7d`, ...).

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::ConfigError;

/// Longest accepted window, ten years.
pub const MAX_WINDOW_HOURS: u32 = 24 * 366 * 10;

static WINDOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*([hd])$").expect("valid window regex"));

/// Convert a window such as `24h`, `48h`, or `7d` into hours.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidWindow`] for anything other than a number
/// followed by `h` or `d`, and for windows longer than [`MAX_WINDOW_HOURS`].
pub fn parse_since_to_hours(raw: &str) -> Result<u32, ConfigError> {
    let normalized = raw.trim().to_lowercase();
    let caps = WINDOW_RE
        .captures(&normalized)
        .ok_or_else(|| ConfigError::InvalidWindow(raw.to_string()))?;

    let n: u32 = caps[1]
        .parse()
        .map_err(|_| ConfigError::InvalidWindow(raw.to_string()))?;

    let hours = match &caps[2] {
        "h" => Some(n),
        _ => n.checked_mul(24),
    };
    hours
        .filter(|h| *h <= MAX_WINDOW_HOURS)
        .ok_or_else(|| ConfigError::InvalidWindow(raw.to_string()))
}

/// Start of the window ending at `now`, clamped to the earliest
/// representable instant.
#[must_use]
pub fn window_start(now: DateTime<Utc>, since_hours: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::hours(i64::from(since_hours)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours() {
        assert_eq!(parse_since_to_hours("24h").unwrap(), 24);
        assert_eq!(parse_since_to_hours("48H").unwrap(), 48);
    }

    #[test]
    fn parses_days() {
        assert_eq!(parse_since_to_hours("7d").unwrap(), 168);
        assert_eq!(parse_since_to_hours(" 2 d ").unwrap(), 48);
    }

    #[test]
    fn rejects_other_units() {
        for raw in ["24", "1w", "h", "", "-3h", "1.5h"] {
            assert!(
                matches!(parse_since_to_hours(raw), Err(ConfigError::InvalidWindow(_))),
                "expected InvalidWindow for {raw:?}"
            );
        }
    }

    #[test]
    fn rejects_windows_past_the_cap() {
        assert_eq!(parse_since_to_hours("3660d").unwrap(), MAX_WINDOW_HOURS);
        for raw in ["3000000000h", "87841h", "3661d", "4294967295d"] {
            assert!(
                matches!(parse_since_to_hours(raw), Err(ConfigError::InvalidWindow(_))),
                "expected InvalidWindow for {raw:?}"
            );
        }
    }

    #[test]
    fn window_start_never_overflows() {
        assert_eq!(window_start(Utc::now(), u32::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(
            window_start(DateTime::<Utc>::MIN_UTC, 1),
            DateTime::<Utc>::MIN_UTC
        );
    }

    #[test]
    fn window_start_subtracts_hours() {
        let now = DateTime::parse_from_rfc3339("2024-05-02T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let start = window_start(now, 36);
        assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }
}
