//! Metric descriptors, per-scrape samples and exposition encoding.
//!
//! Descriptors are `static` and shared by every scrape. Samples are built by
//! the collector, grouped per descriptor and handed to `prometheus-client`,
//! which renders them in the text exposition format.

mod descriptors;
mod encode;
mod sample;

pub use descriptors::{
    ALBUMS, ARTISTS, DESCRIPTORS, MetricDescriptor, OUTPUT_ENABLED, PLAYTIME, SONG_LAST_MODIFIED,
    SONG_LENGTH, SONGS, describe,
};
pub use encode::{CONTENT_TYPE, encode_samples, render};
pub use sample::MetricSample;
