//! MPD metrics collector.
//!
//! One scrape opens a fresh connection and runs two independent steps:
//! - stats step: `stats`, `status` and `outputs` are queried first, then the
//!   song/album/artist/playtime counters and one enabled flag per output are
//!   emitted (`status` is only logged)
//! - songs step: `listallinfo "/"`, length and modification time of every song
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       MpdCollector                       │
//! │   ConnectionConfig + TimestampZone (immutable)           │
//! │                                                          │
//! │   collect() ──▶ MpdClient::connect                       │
//! │                     ├──▶ stats step (stats, status,      │
//! │                     │               outputs)             │
//! │                     └──▶ songs step (listallinfo)        │
//! │                                   ▼                      │
//! │                 Vec<MetricSample>  (call-local)          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed connection yields no samples. Otherwise an error ends only the
//! step it happens in: samples that step already emitted are kept, and the
//! other step still runs. Inside the outputs and songs loops this is
//! fail-fast: one bad record ends the step instead of being skipped.
//!
//! ## Testing (with FakeDaemon)
//!
//! ```
//! use mpd_exporter_core::collector::MpdCollector;
//! use mpd_exporter_core::collector::mock::{FakeDaemon, Script};
//!
//! let daemon = FakeDaemon::start(Script::typical_library());
//! let samples = MpdCollector::new(daemon.config()).collect();
//! assert!(!samples.is_empty());
//! ```

pub mod mock;
mod outputs;
mod songs;
mod stats;
mod status;

use std::time::Instant;

use tracing::{debug, warn};

use crate::error::CollectError;
use crate::metrics::{MetricDescriptor, MetricSample, describe};
use crate::mpd::{Attrs, ConnectionConfig, MpdClient};
use crate::util::TimestampZone;

pub use outputs::OutputDevice;
pub use songs::SongRecord;

/// Scrapes one MPD endpoint into metric samples.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// scrapes.
#[derive(Debug, Clone)]
pub struct MpdCollector {
    config: ConnectionConfig,
    timestamp_zone: TimestampZone,
}

impl MpdCollector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            timestamp_zone: TimestampZone::default(),
        }
    }

    /// Sets the timezone used to read song `Last-Modified` stamps.
    ///
    /// Default: `TimestampZone::Local`.
    pub fn with_timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.timestamp_zone = zone;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn timestamp_zone(&self) -> TimestampZone {
        self.timestamp_zone
    }

    /// The fixed set of descriptors every sample refers to.
    pub fn describe(&self) -> &'static [&'static MetricDescriptor] {
        describe()
    }

    /// Runs one scrape and returns the samples produced.
    ///
    /// Never fails: errors are logged and yield a shorter sample list.
    pub fn collect(&self) -> Vec<MetricSample> {
        let started = Instant::now();
        let mut samples = Vec::new();

        let mut client = match MpdClient::connect(&self.config) {
            Ok(client) => client,
            Err(e) => {
                warn!(host = self.host(), error = %e, "connection failed");
                return samples;
            }
        };

        let stats = self.collect_stats(&mut client, &mut samples);
        self.log_step("stats", stats, &samples);
        let songs = self.collect_songs(&mut client, &mut samples);
        self.log_step("songs", songs, &samples);
        drop(client);

        debug!(
            host = self.host(),
            samples = samples.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scrape finished"
        );
        samples
    }

    fn log_step(&self, step: &str, result: Result<(), CollectError>, samples: &[MetricSample]) {
        if let Err(e) = result {
            warn!(
                host = self.host(),
                step,
                error = %e,
                samples = samples.len(),
                "step stopped early"
            );
        }
    }

    /// Value of the `mpd_host` label.
    pub(crate) fn host(&self) -> &str {
        self.config.addr()
    }
}

/// Reads `field` from `attrs` as text. A missing field is the empty string.
pub(crate) fn text_field<'a>(attrs: &'a Attrs, field: &str) -> &'a str {
    attrs.get(field).map(String::as_str).unwrap_or("")
}

/// Reads `field` from `attrs` as `f64`. A missing field parses as the empty string.
pub(crate) fn parse_float(attrs: &Attrs, field: &'static str) -> Result<f64, CollectError> {
    let value = text_field(attrs, field);
    value
        .parse::<f64>()
        .map_err(|e| CollectError::parse(field, value, e))
}
