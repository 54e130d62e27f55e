use std::path::Path;

/// Build the artwork locator for an album: `<base>/<album_id>`.
///
/// Nothing checks that the image exists; callers render a placeholder
/// when [`artwork_resolves`] says no.
pub fn artwork_locator(base: &Path, album_id: u64) -> String {
    let base = base.to_string_lossy();
    format!("{}/{}", base.trim_end_matches('/'), album_id)
}

pub fn artwork_resolves(locator: &str) -> bool {
    Path::new(locator).is_file()
}
