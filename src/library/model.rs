use std::path::PathBuf;
use std::time::Duration;

/// Identifier of a track, stable within one storage backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

/// One playable audio item.
///
/// Tracks are built once by a scanner and never patched afterwards; a rescan
/// replaces the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    pub album_id: Option<u64>,
    /// Artwork locator derived from `album_id`. Not checked for existence.
    pub artwork: Option<String>,
    /// Duration in milliseconds, 0 when unknown.
    pub duration_ms: u64,
    /// Source handed to the decoder.
    pub location: PathBuf,
}

impl Track {
    pub fn duration(&self) -> Option<Duration> {
        (self.duration_ms > 0).then(|| Duration::from_millis(self.duration_ms))
    }

    /// Artist name, or a fixed label when the backend does not know it.
    pub fn artist_or_unknown(&self) -> &str {
        self.artist
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown artist")
    }
}
