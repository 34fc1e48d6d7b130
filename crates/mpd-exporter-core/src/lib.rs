//! mpd-exporter-core - shared library behind the `mpd_exporter` binary.
//!
//! Provides:
//! - `mpd` - minimal blocking client for the MPD control protocol
//! - `collector` - one-shot scrape of an MPD instance into metric samples
//! - `metrics` - static metric descriptors, samples and exposition encoding
//! - `error` - error taxonomy shared by the client and the collector
//! - `util` - helper utilities (timestamp parsing)

pub mod collector;
pub mod error;
pub mod metrics;
pub mod mpd;
pub mod util;

/// Crate version, reported by `mpd_exporter --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
