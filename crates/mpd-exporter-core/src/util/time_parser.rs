//! Parser for MPD `Last-Modified` stamps.
//!
//! MPD writes modification times as `YYYY-MM-DDThh:mm:ssZ`. Only that exact
//! shape is accepted: no fractional seconds, no numeric offsets.

use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// `strftime` pattern of a `Last-Modified` stamp.
pub const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Error type for time parsing failures.
#[derive(Debug, Clone, Error)]
#[error("failed to parse time '{input}': {message}")]
pub struct TimeParseError {
    pub input: String,
    pub message: String,
}

/// Timezone in which the wall-clock fields of a stamp are interpreted.
///
/// `Local` ignores the trailing `Z` and reads the fields as local time of the
/// running process. It is the default because existing dashboards were built
/// against that behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

/// Parses a `Last-Modified` stamp into Unix seconds.
///
/// | zone | `2024-01-15T14:30:00Z` means |
/// |------|------------------------------|
/// | `Local` | 14:30 local time (earlier instant if ambiguous) |
/// | `Utc` | 14:30 UTC |
///
/// ```
/// use mpd_exporter_core::util::{TimestampZone, parse_last_modified};
///
/// let ts = parse_last_modified("2024-01-15T14:30:00Z", TimestampZone::Utc).unwrap();
/// assert_eq!(ts, 1_705_329_000);
/// ```
pub fn parse_last_modified(input: &str, zone: TimestampZone) -> Result<i64, TimeParseError> {
    match zone {
        TimestampZone::Local => parse_last_modified_in(input, &Local),
        TimestampZone::Utc => parse_last_modified_in(input, &Utc),
    }
}

/// Parses a `Last-Modified` stamp, reading its wall-clock fields in `tz`.
///
/// The trailing `Z` is part of the pattern only; it does not force UTC.
pub fn parse_last_modified_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<i64, TimeParseError> {
    let naive = NaiveDateTime::parse_from_str(input, LAST_MODIFIED_FORMAT).map_err(|e| {
        TimeParseError {
            input: input.to_string(),
            message: format!("expected YYYY-MM-DDThh:mm:ssZ ({})", e),
        }
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| TimeParseError {
            input: input.to_string(),
            message: "local time does not exist (DST gap)".to_string(),
        })
}
