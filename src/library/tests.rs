use super::*;
use crate::config::{LibraryBackend, LibrarySettings};
use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Write a valid 8 kHz mono 8-bit PCM WAV file of `secs` seconds.
fn write_wav(path: &Path, secs: u32) {
    let rate: u32 = 8000;
    let data_len = rate * secs;
    let mut buf: Vec<u8> = Vec::with_capacity(44 + data_len as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&1u16.to_le_bytes()); // mono
    buf.extend_from_slice(&rate.to_le_bytes());
    buf.extend_from_slice(&rate.to_le_bytes()); // byte rate
    buf.extend_from_slice(&1u16.to_le_bytes()); // block align
    buf.extend_from_slice(&8u16.to_le_bytes()); // bits per sample
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    buf.resize(44 + data_len as usize, 128);
    fs::write(path, buf).unwrap();
}

struct FixedIndex(Vec<MediaRow>);

impl MediaIndex for FixedIndex {
    fn query(&self) -> Result<Vec<MediaRow>, ScanError> {
        Ok(self.0.clone())
    }
}

fn row(id: u64, title: &str, is_music: bool, album_id: Option<u64>) -> MediaRow {
    MediaRow {
        id,
        title: title.into(),
        artist: Some("Someone".into()),
        album_id,
        duration_ms: 1000,
        is_music,
        location: PathBuf::from(format!("/music/{title}.mp3")),
    }
}

fn fs_settings() -> LibrarySettings {
    LibrarySettings {
        backend: LibraryBackend::Filesystem,
        ..LibrarySettings::default()
    }
}

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(scan::is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(scan::is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(scan::is_audio_file(Path::new("/tmp/a.wav"), &settings));
    assert!(!scan::is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!scan::is_audio_file(Path::new("/tmp/a"), &settings));

    let dotted = LibrarySettings {
        extensions: vec![".Opus".into()],
        ..LibrarySettings::default()
    };
    assert!(scan::is_audio_file(Path::new("/tmp/a.opus"), &dotted));
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("nope");

    let err = scan_directory(&gone, &fs_settings()).unwrap_err();
    assert!(matches!(err, ScanError::DirectoryMissing(p) if p == gone));

    let err = scan(&gone, &LibrarySettings::default(), dir.path()).unwrap_err();
    assert!(matches!(err, ScanError::DirectoryMissing(_)));
}

/// Remove all permissions from `path`. Returns false when the process can
/// still list it anyway (running as root).
#[cfg(unix)]
fn lock_down(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
    fs::read_dir(path).is_err()
}

#[cfg(unix)]
fn unlock(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_is_skipped() {
    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("hidden.mp3"), b"x").unwrap();
    fs::write(dir.path().join("open.mp3"), b"x").unwrap();

    let enforced = lock_down(&locked);
    let result = scan_directory(dir.path(), &fs_settings());
    unlock(&locked);
    if !enforced {
        return;
    }

    let titles: Vec<String> = result.unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["open".to_string()]);
}

#[cfg(unix)]
#[test]
fn unreadable_root_is_access_denied() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("music");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.mp3"), b"x").unwrap();

    let enforced = lock_down(&root);
    let fs_result = scan_directory(&root, &fs_settings());
    let index_result = scan(&root, &LibrarySettings::default(), dir.path());
    unlock(&root);
    if !enforced {
        return;
    }

    assert!(matches!(fs_result, Err(ScanError::AccessDenied(p)) if p == root));
    assert!(matches!(index_result, Err(ScanError::AccessDenied(_))));
}

#[test]
fn empty_directory_yields_no_tracks() {
    let dir = tempdir().unwrap();
    assert!(scan_directory(dir.path(), &fs_settings()).unwrap().is_empty());
    assert!(
        scan(dir.path(), &LibrarySettings::default(), dir.path())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn filesystem_scan_filters_extensions_and_recurses() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("album");
    fs::create_dir_all(&sub).unwrap();
    fs::write(dir.path().join("one.mp3"), b"not real").unwrap();
    fs::write(sub.join("two.WAV"), b"not real").unwrap();
    fs::write(dir.path().join("cover.jpg"), b"image").unwrap();

    let tracks = scan_directory(dir.path(), &fs_settings()).unwrap();
    let mut titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["one", "two"]);

    for t in &tracks {
        assert_eq!(t.duration_ms, 0);
        assert!(t.artwork.is_none());
        assert!(t.location.is_file());
    }
}

#[test]
fn filesystem_scan_ids_are_stable_across_scans() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join("b.mp3"), b"x").unwrap();

    let first = scan_directory(dir.path(), &fs_settings()).unwrap();
    let second = scan_directory(dir.path(), &fs_settings()).unwrap();
    let ids = |v: &[Track]| {
        let mut ids: Vec<u64> = v.iter().map(|t| t.id.0).collect();
        ids.sort();
        ids
    };
    assert_eq!(ids(&first), ids(&second));
    assert_ne!(first[0].id, first[1].id);
}

#[test]
fn scan_skips_hidden_files_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

    let tracks = scan_directory(dir.path(), &fs_settings()).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "visible");
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..fs_settings()
    };
    let tracks = scan_directory(dir.path(), &settings).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "root");
}

#[test]
fn scan_index_keeps_music_rows_sorted_by_title() {
    let index = FixedIndex(vec![
        row(1, "zebra", true, Some(7)),
        row(2, "ringtone", false, None),
        row(3, "Apple", true, None),
        row(4, "mango", true, Some(7)),
    ]);

    let tracks = scan_index(&index, Path::new("/art/")).unwrap();
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple", "mango", "zebra"]);

    assert_eq!(tracks[0].id, TrackId(3));
    assert_eq!(tracks[0].artwork, None);
    assert_eq!(tracks[1].artwork.as_deref(), Some("/art/7"));
    assert_eq!(tracks[2].artwork.as_deref(), Some("/art/7"));
}

#[test]
fn tag_index_reads_real_audio_and_skips_garbage() {
    let dir = tempdir().unwrap();
    write_wav(&dir.path().join("b.wav"), 1);
    write_wav(&dir.path().join("A.wav"), 2);
    fs::write(dir.path().join("broken.mp3"), b"not an mp3").unwrap();

    let settings = LibrarySettings::default();
    let tracks = scan(dir.path(), &settings, Path::new("/art")).unwrap();

    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "b"]);
    assert!(tracks[0].duration_ms >= 1900 && tracks[0].duration_ms <= 2100);
    assert!(tracks[1].duration_ms >= 900 && tracks[1].duration_ms <= 1100);
    assert!(tracks.iter().all(|t| t.artist.is_none()));
}

#[test]
fn artwork_locator_is_plain_concatenation() {
    assert_eq!(artwork_locator(Path::new("/cache/albumart"), 42), "/cache/albumart/42");
    assert_eq!(artwork_locator(Path::new("/cache/albumart/"), 42), "/cache/albumart/42");
    assert!(!artwork_resolves("/definitely/not/here/42"));

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("9"), b"png").unwrap();
    assert!(artwork_resolves(&artwork_locator(dir.path(), 9)));
}

#[test]
fn track_duration_is_none_when_unknown() {
    let mut t = Track {
        id: TrackId(1),
        title: "t".into(),
        artist: Some("  ".into()),
        album_id: None,
        artwork: None,
        duration_ms: 0,
        location: PathBuf::from("/t.mp3"),
    };
    assert_eq!(t.duration(), None);
    assert_eq!(t.artist_or_unknown(), "Unknown artist");

    t.duration_ms = 1500;
    assert_eq!(t.duration(), Some(std::time::Duration::from_millis(1500)));
}

#[test]
fn spawn_scan_delivers_exactly_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();

    let rx = spawn_scan(dir.path().to_path_buf(), fs_settings(), dir.path().to_path_buf());
    let first = rx.recv().unwrap().unwrap();
    assert_eq!(first.len(), 1);
    assert!(rx.recv().is_err());
}
