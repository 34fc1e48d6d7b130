//! `listallinfo` collection: per-song length and modification time.

use super::{MpdCollector, parse_float, text_field};
use crate::error::CollectError;
use crate::metrics::{MetricSample, SONG_LAST_MODIFIED, SONG_LENGTH};
use crate::mpd::{Attrs, MpdClient};
use crate::util::{TimestampZone, parse_last_modified};

/// Root of the recursive listing.
const LIBRARY_ROOT: &str = "/";

/// One song of the library listing. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord<'a> {
    pub file: &'a str,
    pub title: &'a str,
    pub album: &'a str,
    pub artist: &'a str,
    pub album_artist: &'a str,
    /// Kept as text: MPD passes through tags such as `3/12`.
    pub track: &'a str,
    pub format: &'a str,
    pub last_modified: &'a str,
    attrs: &'a Attrs,
}

impl<'a> SongRecord<'a> {
    pub fn from_attrs(attrs: &'a Attrs) -> Self {
        Self {
            file: text_field(attrs, "file"),
            title: text_field(attrs, "Title"),
            album: text_field(attrs, "Album"),
            artist: text_field(attrs, "Artist"),
            album_artist: text_field(attrs, "AlbumArtist"),
            track: text_field(attrs, "Track"),
            format: text_field(attrs, "Format"),
            last_modified: text_field(attrs, "Last-Modified"),
            attrs,
        }
    }

    /// Duration in seconds; `0.0` when the daemon does not report one.
    pub fn duration(&self) -> Result<f64, CollectError> {
        if text_field(self.attrs, "duration").is_empty() {
            return Ok(0.0);
        }
        parse_float(self.attrs, "duration")
    }

    /// `Last-Modified` as Unix seconds, reading the stamp in `zone`.
    pub fn last_modified_epoch(&self, zone: TimestampZone) -> Result<i64, CollectError> {
        parse_last_modified(self.last_modified, zone)
            .map_err(|e| CollectError::parse("Last-Modified", self.last_modified, e.message))
    }

    /// Label values for the per-song metrics, in descriptor order.
    pub fn labels(&self, host: &str) -> Vec<String> {
        [
            host,
            self.title,
            self.album,
            self.artist,
            self.album_artist,
            self.track,
            self.format,
            self.file,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl MpdCollector {
    /// Emits a length and a last-modified sample for every song.
    ///
    /// A song whose duration or timestamp does not parse ends the step; the
    /// songs before it keep their samples, and so does its own length sample
    /// when only the timestamp is bad.
    pub(crate) fn collect_songs(
        &self,
        client: &mut MpdClient,
        samples: &mut Vec<MetricSample>,
    ) -> Result<(), CollectError> {
        let listing = client.list_all_info(LIBRARY_ROOT)?;

        for attrs in &listing {
            let song = SongRecord::from_attrs(attrs);
            let labels = song.labels(self.host());

            samples.push(MetricSample::new(
                &SONG_LENGTH,
                song.duration()?,
                labels.clone(),
            ));

            let modified = song.last_modified_epoch(self.timestamp_zone)?;
            samples.push(MetricSample::new(
                &SONG_LAST_MODIFIED,
                modified as f64,
                labels,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(raw: &[(&str, &str)]) -> Attrs {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_attrs_reads_tags() {
        let a = attrs(&[
            ("file", "Pink Floyd/Animals/01.flac"),
            ("Title", "Pigs on the Wing 1"),
            ("Album", "Animals"),
            ("Artist", "Pink Floyd"),
            ("AlbumArtist", "Pink Floyd"),
            ("Track", "1/5"),
            ("Format", "44100:16:2"),
            ("duration", "85.333"),
            ("Last-Modified", "2021-03-04T05:06:07Z"),
        ]);
        let song = SongRecord::from_attrs(&a);
        assert_eq!(song.track, "1/5");
        assert_eq!(song.album_artist, "Pink Floyd");
        assert_eq!(song.duration().unwrap(), 85.333);
        assert_eq!(
            song.last_modified_epoch(TimestampZone::Utc).unwrap(),
            1_614_834_367
        );
    }

    #[test]
    fn test_missing_and_empty_duration_are_zero() {
        let missing = attrs(&[("file", "a.mp3")]);
        assert_eq!(SongRecord::from_attrs(&missing).duration().unwrap(), 0.0);

        let empty = attrs(&[("file", "a.mp3"), ("duration", "")]);
        assert_eq!(SongRecord::from_attrs(&empty).duration().unwrap(), 0.0);
    }

    #[test]
    fn test_bad_duration() {
        let a = attrs(&[("file", "a.mp3"), ("duration", "3:30")]);
        assert!(matches!(
            SongRecord::from_attrs(&a).duration(),
            Err(CollectError::Parse {
                field: "duration",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_last_modified_is_parse_error() {
        let a = attrs(&[("file", "a.mp3")]);
        assert!(matches!(
            SongRecord::from_attrs(&a).last_modified_epoch(TimestampZone::Local),
            Err(CollectError::Parse {
                field: "Last-Modified",
                ..
            })
        ));
    }

    #[test]
    fn test_labels_order() {
        let a = attrs(&[
            ("file", "f"),
            ("Title", "t"),
            ("Album", "al"),
            ("Artist", "ar"),
            ("AlbumArtist", "aa"),
            ("Track", "3"),
            ("Format", "fmt"),
        ]);
        let labels = SongRecord::from_attrs(&a).labels("h");
        assert_eq!(labels, vec!["h", "t", "al", "ar", "aa", "3", "fmt", "f"]);
        assert_eq!(labels.len(), SONG_LENGTH.labels.len());
    }
}
