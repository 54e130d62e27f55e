//! Music library scanning.
//!
//! Two strategies produce the same `Track` list: a tag-backed media index
//! (music rows only, sorted by title) and a plain filesystem walk (every
//! matching file, in walk order).

use std::path::Path;

mod artwork;
mod background;
mod index;
mod model;
mod scan;

pub use artwork::{artwork_locator, artwork_resolves};
pub use background::{ScanResult, spawn_scan};
pub use index::{MediaIndex, MediaRow, TagIndex, scan_index};
pub use model::{Track, TrackId};
pub use scan::scan_directory;

use crate::config::{LibraryBackend, LibrarySettings};
use crate::error::ScanError;

/// Scan `dir` with the backend selected in `settings`.
pub fn scan(
    dir: &Path,
    settings: &LibrarySettings,
    artwork_base: &Path,
) -> Result<Vec<Track>, ScanError> {
    match settings.backend {
        LibraryBackend::Filesystem => scan_directory(dir, settings),
        LibraryBackend::Index => scan_index(&TagIndex::new(dir, settings), artwork_base),
    }
}

#[cfg(test)]
mod tests;
