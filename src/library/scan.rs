//! Filesystem walk shared by both scan strategies.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use xxhash_rust::xxh64::xxh64;

use crate::config::LibrarySettings;
use crate::error::ScanError;

use super::model::{Track, TrackId};

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Hash a path into an id that stays stable for as long as the file does not move.
pub(super) fn path_id(path: &Path) -> u64 {
    xxh64(path.as_os_str().as_encoded_bytes(), 0)
}

pub(super) fn file_stem_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// Collect audio files under `dir` in walk order. Unreadable entries are skipped.
pub(super) fn walk_audio_files(
    dir: &Path,
    settings: &LibrarySettings,
) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryMissing(dir.to_path_buf()));
    }
    if let Err(e) = std::fs::read_dir(dir) {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            return Err(ScanError::AccessDenied(dir.to_path_buf()));
        }
    }

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let files = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.path().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p, settings))
        .collect();

    Ok(files)
}

/// Filesystem strategy: every matching file becomes a track, in walk order,
/// titled after its file name.
pub fn scan_directory(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, ScanError> {
    let tracks: Vec<Track> = walk_audio_files(dir, settings)?
        .into_iter()
        .map(|path| Track {
            id: TrackId(path_id(&path)),
            title: file_stem_title(&path),
            artist: None,
            album_id: None,
            artwork: None,
            duration_ms: 0,
            location: path,
        })
        .collect();

    info!("filesystem scan of {} found {} tracks", dir.display(), tracks.len());
    Ok(tracks)
}
