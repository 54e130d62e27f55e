//! Error types shared by the library scanner and the playback coordinator.
//!
//! None of these are fatal: the runtime turns each one into a transient
//! notice and keeps going.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while enumerating the music library.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("music directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("access to {} was denied", .0.display())]
    AccessDenied(PathBuf),

    #[error("media index query failed: {0}")]
    Index(String),
}

/// Failures raised by the playback coordinator and its decoder handle.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot prepare {}: {reason}", path.display())]
    PrepareFailed { path: PathBuf, reason: String },

    #[error("no source set on decoder")]
    NoSource,

    #[error("decoder error (what={what}, extra={extra})")]
    DecoderRuntime { what: i32, extra: i32 },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("no audio output device: {0}")]
    OutputUnavailable(String),
}
