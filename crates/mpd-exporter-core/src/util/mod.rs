//! Utility modules for mpd-exporter.

mod time_parser;

pub use time_parser::{
    LAST_MODIFIED_FORMAT, TimeParseError, TimestampZone, parse_last_modified,
    parse_last_modified_in,
};
