//! Application model: `App` and the seek slider.
//!
//! The `App` holds what the list view and the transport bar render: the
//! track list, the selection, the latest playback snapshot and any transient
//! notice. Gestures are turned into [`PlayerCmd`]s here; the model never
//! talks to the coordinator directly.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ScanError;
use crate::library::{ScanResult, Track, artwork_resolves};
use crate::playback::{Notice, PlaybackSnapshot, PlayerCmd, PlayerStatus};

/// Outcome of the storage access check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Pending,
    Granted,
    Denied,
}

/// Where the library listing stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LibraryState {
    #[default]
    Scanning,
    Ready,
    Failed,
}

/// Position slider under the transport bar.
///
/// While a drag is in progress the slider keeps its own value and ignores
/// snapshot updates. Releasing it yields exactly one seek target.
#[derive(Debug, Default, Clone)]
pub struct SeekSlider {
    drag: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    target_ms: u64,
    last_input: Instant,
}

impl SeekSlider {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Move the slider by `delta_ms` from `from_ms`, clamped to `[0, max_ms]`.
    pub fn drag_by(&mut self, from_ms: u64, delta_ms: i64, max_ms: u64, now: Instant) {
        let base = self.drag.map_or(from_ms, |d| d.target_ms);
        let target_ms = base.saturating_add_signed(delta_ms).min(max_ms);
        self.drag = Some(Drag {
            target_ms,
            last_input: now,
        });
    }

    pub fn target_ms(&self) -> Option<u64> {
        self.drag.map(|d| d.target_ms)
    }

    /// End the drag, returning where it was released.
    pub fn release(&mut self) -> Option<u64> {
        self.drag.take().map(|d| d.target_ms)
    }

    /// End the drag if no input arrived for `quiet`.
    pub fn release_if_idle(&mut self, now: Instant, quiet: Duration) -> Option<u64> {
        match self.drag {
            Some(d) if now.saturating_duration_since(d.last_input) >= quiet => self.release(),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub playback: PlaybackSnapshot,
    pub access: AccessState,
    pub library: LibraryState,
    pub slider: SeekSlider,
    pub current_dir: Option<String>,
    pub metadata_window: bool,
    /// Whether the current track's artwork existed when it became current.
    pub artwork_present: bool,

    notice: Option<(String, Instant)>,
    notice_ttl: Duration,
}

impl App {
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            tracks: Vec::new(),
            selected: 0,
            playback: PlaybackSnapshot::default(),
            access: AccessState::Pending,
            library: LibraryState::Scanning,
            slider: SeekSlider::default(),
            current_dir: None,
            metadata_window: false,
            artwork_present: false,
            notice: None,
            notice_ttl,
        }
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn grant_access(&mut self) {
        self.access = AccessState::Granted;
    }

    /// Access was refused: the list stays empty and transport is inert.
    pub fn deny_access(&mut self, now: Instant) {
        self.access = AccessState::Denied;
        self.library = LibraryState::Failed;
        self.tracks.clear();
        self.selected = 0;
        self.slider.cancel();
        self.push_notice(&Notice::AccessDenied, now);
    }

    /// Take the result of a background scan. Returns the queue update for the
    /// coordinator when the scan produced a list.
    pub fn apply_scan_result(&mut self, result: ScanResult, now: Instant) -> Option<PlayerCmd> {
        match result {
            Ok(tracks) => self.set_tracks(tracks, now),
            Err(ScanError::AccessDenied(dir)) => {
                warn!("scan of {} denied", dir.display());
                self.deny_access(now);
                None
            }
            Err(ScanError::DirectoryMissing(dir)) => {
                self.library = LibraryState::Failed;
                self.push_notice(&Notice::DirectoryMissing(dir.display().to_string()), now);
                None
            }
            Err(e) => {
                self.library = LibraryState::Failed;
                self.push_notice(&Notice::ScanFailed(e.to_string()), now);
                None
            }
        }
    }

    /// Replace the whole track list and reset the selection.
    pub fn set_tracks(&mut self, tracks: Vec<Track>, now: Instant) -> Option<PlayerCmd> {
        if self.access == AccessState::Denied {
            return None;
        }
        debug!("library replaced with {} tracks", tracks.len());
        self.tracks = tracks;
        self.selected = 0;
        self.library = LibraryState::Ready;
        if self.tracks.is_empty() {
            self.push_notice(&Notice::NoMusicFound, now);
        }
        Some(PlayerCmd::SetQueue(self.tracks.clone()))
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Transport actions only make sense with access and a non-empty list.
    pub fn transport_enabled(&self) -> bool {
        self.access == AccessState::Granted && self.has_tracks()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Enter on the list: play the selected track.
    pub fn play_selected(&self) -> Option<PlayerCmd> {
        if !self.transport_enabled() {
            return None;
        }
        self.selected_track().cloned().map(PlayerCmd::Play)
    }

    pub fn toggle_play_pause(&self) -> Option<PlayerCmd> {
        self.transport_enabled().then_some(PlayerCmd::TogglePlayPause)
    }

    pub fn skip_next(&self) -> Option<PlayerCmd> {
        self.transport_enabled().then_some(PlayerCmd::Next)
    }

    pub fn skip_prev(&self) -> Option<PlayerCmd> {
        self.transport_enabled().then_some(PlayerCmd::Previous)
    }

    /// Copy the coordinator's latest state into the model.
    ///
    /// A drag is dropped when the track changes under it; its target belonged
    /// to the previous track.
    pub fn sync_playback(&mut self, snapshot: PlaybackSnapshot) {
        let changed = snapshot.current.as_ref().map(|t| t.id)
            != self.playback.current.as_ref().map(|t| t.id);
        if changed || snapshot.current.is_none() {
            self.slider.cancel();
        }
        if changed {
            self.artwork_present = snapshot
                .current
                .as_ref()
                .and_then(|t| t.artwork.as_deref())
                .is_some_and(artwork_resolves);
        }
        self.playback = snapshot;
    }

    /// Value shown on the slider: the drag target while dragging, otherwise
    /// the published position.
    pub fn slider_position_ms(&self) -> u64 {
        self.slider.target_ms().unwrap_or(self.playback.position_ms)
    }

    /// Whether the slider can be moved at all.
    pub fn can_seek(&self) -> bool {
        self.transport_enabled()
            && self.playback.duration_ms > 0
            && matches!(
                self.playback.status,
                PlayerStatus::Playing | PlayerStatus::Paused
            )
    }

    /// Scrub the slider by `seconds` (negative moves back).
    pub fn drag_slider_by(&mut self, seconds: i64, now: Instant) {
        if !self.can_seek() {
            return;
        }
        self.slider.drag_by(
            self.playback.position_ms,
            seconds.saturating_mul(1000),
            self.playback.duration_ms,
            now,
        );
    }

    /// Release the slider once scrubbing has gone quiet, issuing one seek.
    pub fn release_slider_if_idle(&mut self, now: Instant, quiet: Duration) -> Option<PlayerCmd> {
        let target = self.slider.release_if_idle(now, quiet)?;
        self.commit_seek(target)
    }

    /// Release the slider immediately, issuing one seek.
    pub fn release_slider(&mut self) -> Option<PlayerCmd> {
        let target = self.slider.release()?;
        self.commit_seek(target)
    }

    fn commit_seek(&mut self, target: u64) -> Option<PlayerCmd> {
        // Show the target until the coordinator publishes its own position.
        self.playback.position_ms = target;
        Some(PlayerCmd::Seek(target))
    }

    pub fn push_notice(&mut self, notice: &Notice, now: Instant) {
        self.notice = Some((notice.to_string(), now + self.notice_ttl));
    }

    /// The notice to display at `now`, if one is still live.
    pub fn active_notice(&self, now: Instant) -> Option<&str> {
        match &self.notice {
            Some((text, until)) if now < *until => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.tracks.len();
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Index of the playing track in the list, if it is there.
    pub fn playing_index(&self) -> Option<usize> {
        let current = self.playback.current.as_ref()?;
        self.tracks.iter().position(|t| t.id == current.id)
    }
}
