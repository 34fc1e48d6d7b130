//! Pre-built daemon scripts and response builders.

use super::daemon::Script;

/// A `stats` response with the four counters the exporter reads.
pub fn stats_response(songs: u64, albums: u64, artists: u64, playtime: u64) -> String {
    format!(
        "uptime: 4242\n\
         playtime: {playtime}\n\
         artists: {artists}\n\
         albums: {albums}\n\
         songs: {songs}\n\
         db_playtime: 123456\n\
         db_update: 1700000000\n\
         OK\n"
    )
}

/// One record of an `outputs` response (without the final `OK`).
pub fn output_block(id: u32, name: &str, plugin: &str, enabled: &str) -> String {
    format!(
        "outputid: {id}\n\
         outputname: {name}\n\
         plugin: {plugin}\n\
         outputenabled: {enabled}\n\
         attribute: dop=0\n"
    )
}

/// One song record of a `listallinfo` response (without the final `OK`).
///
/// `duration` of `None` leaves the field out entirely.
pub fn song_block(
    file: &str,
    title: &str,
    artist: &str,
    duration: Option<&str>,
    last_modified: &str,
) -> String {
    let mut block = format!(
        "file: {file}\n\
         Last-Modified: {last_modified}\n\
         Format: 44100:16:2\n\
         Artist: {artist}\n\
         AlbumArtist: {artist}\n\
         Title: {title}\n\
         Album: Demo Album\n\
         Track: 1\n"
    );
    if let Some(duration) = duration {
        block.push_str(&format!("Time: 0\nduration: {duration}\n"));
    }
    block
}

impl Script {
    /// A small library: 10 songs, 3 albums, 2 artists, 3600 s playtime,
    /// output `A` enabled and output `B` disabled, and two songs in the listing.
    pub fn typical_library() -> Self {
        let outputs = format!(
            "{}{}OK\n",
            output_block(0, "A", "alsa", "1"),
            output_block(1, "B", "httpd", "0")
        );
        let listing = format!(
            "directory: Demo\n\
             Last-Modified: 2024-01-01T00:00:00Z\n\
             {}{}OK\n",
            song_block(
                "Demo/01.flac",
                "First",
                "Demo Artist",
                Some("215.500"),
                "2024-01-15T14:30:00Z"
            ),
            song_block(
                "Demo/02.flac",
                "Second",
                "Demo Artist",
                None,
                "2023-06-30T23:59:59Z"
            ),
        );

        Self::new()
            .respond("stats", stats_response(10, 3, 2, 3600))
            .respond("status", "volume: 50\nrepeat: 0\nstate: stop\nOK\n")
            .respond("outputs", outputs)
            .respond("listallinfo \"/\"", listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_block_without_duration() {
        let block = song_block("a.mp3", "A", "X", None, "2024-01-01T00:00:00Z");
        assert!(!block.contains("duration:"));
        assert!(block.starts_with("file: a.mp3\n"));
    }

    #[test]
    fn test_output_block_starts_record() {
        let block = output_block(3, "Pipe", "fifo", "1");
        assert!(block.starts_with("outputid: 3\n"));
        assert!(block.contains("outputenabled: 1\n"));
    }
}
