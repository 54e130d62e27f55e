use super::*;
use crate::error::ScanError;
use crate::library::{Track, TrackId};
use crate::playback::{Notice, PlaybackSnapshot, PlayerCmd, PlayerStatus};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TTL: Duration = Duration::from_secs(3);
const QUIET: Duration = Duration::from_millis(400);

fn t(title: &str, id: u64) -> Track {
    Track {
        id: TrackId(id),
        title: title.into(),
        artist: None,
        album_id: None,
        artwork: None,
        duration_ms: 200_000,
        location: PathBuf::from(format!("/music/{title}.mp3")),
    }
}

fn ready_app(titles: &[&str]) -> App {
    let mut app = App::new(TTL);
    app.grant_access();
    let tracks = titles
        .iter()
        .enumerate()
        .map(|(i, s)| t(s, i as u64))
        .collect();
    app.set_tracks(tracks, Instant::now());
    app
}

fn playing(app: &App, position_ms: u64) -> PlaybackSnapshot {
    PlaybackSnapshot {
        current: app.tracks.first().cloned(),
        is_playing: true,
        position_ms,
        duration_ms: 200_000,
        status: PlayerStatus::Playing,
    }
}

#[test]
fn empty_scan_shows_notice_and_disables_transport() {
    let now = Instant::now();
    let mut app = App::new(TTL);
    app.grant_access();

    let cmd = app.apply_scan_result(Ok(Vec::new()), now);
    assert!(matches!(cmd, Some(PlayerCmd::SetQueue(ref q)) if q.is_empty()));
    assert_eq!(app.library, LibraryState::Ready);
    assert_eq!(app.active_notice(now), Some(Notice::NoMusicFound.to_string().as_str()));

    assert!(!app.transport_enabled());
    assert!(app.play_selected().is_none());
    assert!(app.toggle_play_pause().is_none());
    assert!(app.skip_next().is_none());
    assert!(app.skip_prev().is_none());
}

#[test]
fn scan_result_replaces_list_and_queue() {
    let now = Instant::now();
    let mut app = ready_app(&["Old"]);
    app.next();

    let cmd = app.apply_scan_result(Ok(vec![t("A", 1), t("B", 2)]), now);
    match cmd {
        Some(PlayerCmd::SetQueue(q)) => assert_eq!(q.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(app.tracks.len(), 2);
    assert_eq!(app.selected, 0);
    assert!(app.active_notice(now).is_none());
}

#[test]
fn missing_directory_is_reported() {
    let now = Instant::now();
    let mut app = App::new(TTL);
    app.grant_access();
    let cmd = app.apply_scan_result(Err(ScanError::DirectoryMissing("/nowhere".into())), now);

    assert!(cmd.is_none());
    assert_eq!(app.library, LibraryState::Failed);
    assert!(app.active_notice(now).unwrap().contains("/nowhere"));
}

#[test]
fn denied_access_keeps_list_empty_and_transport_inert() {
    let now = Instant::now();
    let mut app = App::new(TTL);
    app.deny_access(now);

    assert!(app.set_tracks(vec![t("A", 1)], now).is_none());
    assert!(app.tracks.is_empty());
    assert!(!app.transport_enabled());
    assert!(app.toggle_play_pause().is_none());
    assert_eq!(app.active_notice(now), Some(Notice::AccessDenied.to_string().as_str()));
}

#[test]
fn transport_commands_when_enabled() {
    let mut app = ready_app(&["A", "B"]);
    app.next();
    match app.play_selected() {
        Some(PlayerCmd::Play(track)) => assert_eq!(track.title, "B"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(app.toggle_play_pause(), Some(PlayerCmd::TogglePlayPause)));
    assert!(matches!(app.skip_next(), Some(PlayerCmd::Next)));
    assert!(matches!(app.skip_prev(), Some(PlayerCmd::Previous)));
}

#[test]
fn selection_wraps() {
    let mut app = ready_app(&["A", "B", "C"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn selection_on_empty_list_is_noop() {
    let mut app = App::new(TTL);
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn slider_follows_snapshot_when_idle() {
    let mut app = ready_app(&["A"]);
    app.sync_playback(playing(&app, 1_000));
    assert_eq!(app.slider_position_ms(), 1_000);
    app.sync_playback(playing(&app, 1_500));
    assert_eq!(app.slider_position_ms(), 1_500);
}

#[test]
fn drag_suppresses_snapshot_and_releases_one_seek() {
    let start = Instant::now();
    let mut app = ready_app(&["A"]);
    app.sync_playback(playing(&app, 10_000));

    app.drag_slider_by(5, start);
    app.drag_slider_by(5, start + Duration::from_millis(100));
    assert_eq!(app.slider_position_ms(), 20_000);

    // Coordinator keeps publishing while the drag is in progress.
    app.sync_playback(playing(&app, 10_500));
    assert_eq!(app.slider_position_ms(), 20_000);

    assert!(app.release_slider_if_idle(start + Duration::from_millis(200), QUIET).is_none());

    let cmd = app.release_slider_if_idle(start + Duration::from_millis(600), QUIET);
    assert!(matches!(cmd, Some(PlayerCmd::Seek(20_000))));
    assert!(app.release_slider_if_idle(start + Duration::from_secs(5), QUIET).is_none());
    assert!(app.release_slider().is_none());
    assert_eq!(app.slider_position_ms(), 20_000);
}

#[test]
fn drag_clamps_to_track_bounds() {
    let now = Instant::now();
    let mut app = ready_app(&["A"]);
    app.sync_playback(playing(&app, 2_000));

    app.drag_slider_by(-10, now);
    assert_eq!(app.release_slider().map(|c| matches!(c, PlayerCmd::Seek(0))), Some(true));

    app.sync_playback(playing(&app, 199_000));
    app.drag_slider_by(10, now);
    assert!(matches!(app.release_slider(), Some(PlayerCmd::Seek(200_000))));
}

#[test]
fn drag_ignored_without_prepared_track() {
    let now = Instant::now();
    let mut app = ready_app(&["A"]);
    app.drag_slider_by(5, now);
    assert!(!app.slider.is_dragging());

    let mut snap = playing(&app, 0);
    snap.status = PlayerStatus::Preparing;
    app.sync_playback(snap);
    app.drag_slider_by(5, now);
    assert!(!app.slider.is_dragging());
}

#[test]
fn losing_the_current_track_cancels_drag() {
    let now = Instant::now();
    let mut app = ready_app(&["A"]);
    app.sync_playback(playing(&app, 0));
    app.drag_slider_by(5, now);
    assert!(app.slider.is_dragging());

    app.sync_playback(PlaybackSnapshot::default());
    assert!(!app.slider.is_dragging());
    assert!(app.release_slider().is_none());
}

#[test]
fn track_change_during_drag_cancels_it() {
    let now = Instant::now();
    let mut app = ready_app(&["A", "B"]);
    app.sync_playback(playing(&app, 10_000));
    app.drag_slider_by(5, now);

    let mut next = playing(&app, 0);
    next.current = app.tracks.get(1).cloned();
    app.sync_playback(next);

    assert!(!app.slider.is_dragging());
    assert!(app.release_slider_if_idle(now + Duration::from_secs(1), QUIET).is_none());
    assert_eq!(app.slider_position_ms(), 0);
}

#[test]
fn artwork_presence_is_checked_once_per_track() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let mut app = ready_app(&["A", "B"]);
    app.tracks[0].artwork = Some(tmp.path().display().to_string());

    app.sync_playback(playing(&app, 0));
    assert!(app.artwork_present);

    // Later refreshes of the same track reuse the cached answer.
    let art = tmp.path().to_path_buf();
    drop(tmp);
    assert!(!art.exists());
    app.sync_playback(playing(&app, 500));
    assert!(app.artwork_present);

    let mut next = playing(&app, 0);
    next.current = app.tracks.get(1).cloned();
    app.sync_playback(next);
    assert!(!app.artwork_present);
}

#[test]
fn notice_expires() {
    let now = Instant::now();
    let mut app = App::new(TTL);
    app.push_notice(&Notice::NowPlaying("A".into()), now);
    assert_eq!(app.active_notice(now + Duration::from_secs(1)), Some("Now playing A"));
    assert!(app.active_notice(now + TTL).is_none());
}

#[test]
fn playing_index_matches_by_id() {
    let mut app = ready_app(&["A", "B"]);
    assert_eq!(app.playing_index(), None);
    let mut snap = playing(&app, 0);
    snap.current = Some(app.tracks[1].clone());
    app.sync_playback(snap);
    assert_eq!(app.playing_index(), Some(1));
}

#[test]
fn toggle_metadata_window_flips() {
    let mut app = App::new(TTL);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    app.toggle_metadata_window();
    assert!(!app.metadata_window);
}
