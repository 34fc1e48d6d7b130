//! The fixed metric catalogue.

/// Static definition of one metric: name, help text and ordered label names.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const HOST_LABELS: &[&str] = &["mpd_host"];

const OUTPUT_LABELS: &[&str] = &["mpd_host", "output_id", "output_name", "plugin", "attribute"];

const SONG_LABELS: &[&str] = &[
    "mpd_host",
    "title",
    "album",
    "artist",
    "albumartist",
    "track",
    "format",
    "file",
];

pub static SONGS: MetricDescriptor = MetricDescriptor {
    name: "mpd_stats_songs",
    help: "The number of songs in the collection",
    labels: HOST_LABELS,
};

pub static ALBUMS: MetricDescriptor = MetricDescriptor {
    name: "mpd_stats_albums",
    help: "The number of albums in the collection",
    labels: HOST_LABELS,
};

pub static ARTISTS: MetricDescriptor = MetricDescriptor {
    name: "mpd_stats_artists",
    help: "The number of artists in the collection",
    labels: HOST_LABELS,
};

pub static PLAYTIME: MetricDescriptor = MetricDescriptor {
    name: "mpd_stats_playtime",
    help: "Playtime of the collection",
    labels: HOST_LABELS,
};

pub static OUTPUT_ENABLED: MetricDescriptor = MetricDescriptor {
    name: "mpd_stats_output",
    help: "Output enabled",
    labels: OUTPUT_LABELS,
};

pub static SONG_LENGTH: MetricDescriptor = MetricDescriptor {
    name: "mpd_song_length_seconds",
    help: "Song length in seconds.",
    labels: SONG_LABELS,
};

pub static SONG_LAST_MODIFIED: MetricDescriptor = MetricDescriptor {
    name: "mpd_song_lastmodified_epoch",
    help: "Song last modified in epoch",
    labels: SONG_LABELS,
};

/// All descriptors, in exposition order.
pub static DESCRIPTORS: [&MetricDescriptor; 7] = [
    &SONGS,
    &ALBUMS,
    &ARTISTS,
    &PLAYTIME,
    &OUTPUT_ENABLED,
    &SONG_LENGTH,
    &SONG_LAST_MODIFIED,
];

/// Returns the full descriptor set. Always the same seven, in the same order.
pub fn describe() -> &'static [&'static MetricDescriptor] {
    &DESCRIPTORS
}
