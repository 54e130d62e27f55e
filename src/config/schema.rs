use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/khmusic/config.toml` or `~/.config/khmusic/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `KHMUSIC__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub logging: LoggingSettings,
}

/// Which storage strategy the scanner uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryBackend {
    /// Walk the directory tree, keep filesystem order, titles from file names.
    #[serde(alias = "fs", alias = "walk")]
    Filesystem,
    /// Build a tag index, keep music rows only, sort by title.
    #[serde(alias = "media-index", alias = "tags")]
    Index,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root of the music library. Falls back to `$XDG_MUSIC_DIR` or `~/Music`.
    pub music_dir: Option<PathBuf>,
    pub backend: LibraryBackend,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Base path album artwork locators are built from.
    pub artwork_base: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: None,
            backend: LibraryBackend::Index,
            extensions: vec!["mp3".into(), "wav".into(), "flac".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            artwork_base: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Interval of the position refresh while a track plays (milliseconds).
    pub position_refresh_ms: u64,
    /// Start playing as soon as the decoder reports ready.
    /// When false a freshly prepared track waits paused.
    pub autoplay_on_ready: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            position_refresh_ms: 500,
            autoplay_on_ready: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// How long a notice stays on screen (milliseconds).
    pub notice_ms: u64,

    /// Which time fields to show next to the seek bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " KHMusic ".to_string(),
            notice_ms: 3000,
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds the slider moves per `H` / `L`.
    pub scrub_seconds: u64,
    /// Idle time after the last scrub key before the drag is released
    /// and a single seek is sent (milliseconds).
    pub scrub_commit_ms: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            scrub_commit_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Falls back to the XDG state dir.
    pub directory: Option<PathBuf>,
    /// Log file prefix; the appender adds the date.
    pub file_name: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "khmusic.log".to_string(),
            filter: "info,khmusic=debug".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}
