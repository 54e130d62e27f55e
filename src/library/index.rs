//! Media-index strategy: query rows, keep the music ones, sort by title.

use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, info};
use xxhash_rust::xxh64::xxh64;

use crate::config::LibrarySettings;
use crate::error::ScanError;

use super::artwork::artwork_locator;
use super::model::{Track, TrackId};
use super::scan::{file_stem_title, path_id, walk_audio_files};

/// One row returned by a media index query.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRow {
    pub id: u64,
    pub title: String,
    pub artist: Option<String>,
    pub album_id: Option<u64>,
    pub duration_ms: u64,
    pub is_music: bool,
    pub location: PathBuf,
}

/// A queryable index of the audio files on the device.
pub trait MediaIndex {
    fn query(&self) -> Result<Vec<MediaRow>, ScanError>;
}

/// Index built on the fly by reading tags of every audio file under `root`.
pub struct TagIndex<'a> {
    root: &'a Path,
    settings: &'a LibrarySettings,
}

impl<'a> TagIndex<'a> {
    pub fn new(root: &'a Path, settings: &'a LibrarySettings) -> Self {
        Self { root, settings }
    }
}

fn album_id(album: &str) -> u64 {
    xxh64(album.trim().to_lowercase().as_bytes(), 0)
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn read_row(path: PathBuf) -> MediaRow {
    let mut row = MediaRow {
        id: path_id(&path),
        title: file_stem_title(&path),
        artist: None,
        album_id: None,
        duration_ms: 0,
        is_music: false,
        location: path,
    };

    let tagged = match lofty::read_from_path(&row.location) {
        Ok(t) => t,
        Err(e) => {
            debug!("no tags for {}: {e}", row.location.display());
            return row;
        }
    };

    row.duration_ms = tagged.properties().duration().as_millis() as u64;
    row.is_music = row.duration_ms > 0;

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(title) = non_empty(tag.title()) {
            row.title = title;
        }
        row.artist = non_empty(tag.artist());
        row.album_id = non_empty(tag.album()).map(|a| album_id(&a));
    }

    row
}

impl MediaIndex for TagIndex<'_> {
    fn query(&self) -> Result<Vec<MediaRow>, ScanError> {
        let rows = walk_audio_files(self.root, self.settings)?
            .into_iter()
            .map(read_row)
            .collect();
        Ok(rows)
    }
}

/// Query `index` and turn its music rows into tracks sorted by title.
pub fn scan_index(index: &dyn MediaIndex, artwork_base: &Path) -> Result<Vec<Track>, ScanError> {
    let mut tracks: Vec<Track> = index
        .query()?
        .into_iter()
        .filter(|row| row.is_music)
        .map(|row| Track {
            id: TrackId(row.id),
            artwork: row.album_id.map(|a| artwork_locator(artwork_base, a)),
            title: row.title,
            artist: row.artist,
            album_id: row.album_id,
            duration_ms: row.duration_ms,
            location: row.location,
        })
        .collect();

    tracks.sort_by_key(|t| t.title.to_lowercase());
    info!("media index returned {} music tracks", tracks.len());
    Ok(tracks)
}
