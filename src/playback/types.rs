//! Playback-related small types and handles.
//!
//! Commands flow into the coordinator thread over a channel; state flows
//! out through a shared snapshot and a notice channel.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::library::Track;

/// Lifecycle of the single decoder session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    /// No track loaded.
    #[default]
    Idle,
    /// Source set, waiting for the decoder to report ready.
    Preparing,
    Playing,
    Paused,
}

#[derive(Debug)]
pub enum PlayerCmd {
    /// Replace the queue and reset the cursor. Does not start playback.
    SetQueue(Vec<Track>),
    /// Load and play the given track.
    Play(Track),
    /// Pause, resume, or start the current queue entry.
    TogglePlayPause,
    /// Skip to the next queue entry (wraps).
    Next,
    /// Go back to the previous queue entry (wraps).
    Previous,
    /// Jump to an absolute position in milliseconds.
    Seek(u64),
    /// Release the decoder and stop the coordinator thread.
    Shutdown,
}

/// Playback state published by the coordinator, read-only everywhere else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub current: Option<Track>,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub status: PlayerStatus,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackSnapshot>>;

/// Transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoMusicFound,
    DirectoryMissing(String),
    AccessDenied,
    ScanFailed(String),
    PlaybackFailed(String),
    DecoderError(String),
    NowPlaying(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoMusicFound => write!(f, "No music found"),
            Notice::DirectoryMissing(dir) => write!(f, "Music directory not found: {dir}"),
            Notice::AccessDenied => write!(f, "Storage access is required to list music"),
            Notice::ScanFailed(msg) => write!(f, "Could not list music: {msg}"),
            Notice::PlaybackFailed(msg) => write!(f, "Could not play: {msg}"),
            Notice::DecoderError(msg) => write!(f, "Playback error: {msg}"),
            Notice::NowPlaying(title) => write!(f, "Now playing {title}"),
        }
    }
}
