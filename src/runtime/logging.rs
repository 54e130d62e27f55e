//! Logging setup.
//!
//! The TUI owns the terminal, so events go to a daily-rolling file. In dev
//! mode they are also captured in memory and replayed on stderr once the
//! terminal has been restored.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::config::LoggingSettings;

/// In-memory copy of everything logged during the session.
#[derive(Clone, Default)]
pub struct DevCapture(Arc<Mutex<Vec<u8>>>);

impl DevCapture {
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for DevCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut inner) = self.0.lock() {
            inner.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DevCapture {
    type Writer = DevCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file: WorkerGuard,
    capture: Option<DevCapture>,
}

impl LogGuard {
    /// Replay captured events on stderr (dev mode only).
    pub fn replay_to_stderr(&self) {
        if let Some(capture) = &self.capture {
            let text = capture.contents();
            if !text.is_empty() {
                eprint!("{text}");
            }
        }
    }
}

/// The file writer, teed into `capture` when one is given.
fn build_writer<W>(file: W, capture: Option<DevCapture>) -> BoxMakeWriter
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    match capture {
        Some(c) => BoxMakeWriter::new(file.and(c)),
        None => BoxMakeWriter::new(file),
    }
}

fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(settings: &LoggingSettings, dir: &Path, dev: bool) -> anyhow::Result<LogGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(dir, &settings.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let capture = dev.then(DevCapture::default);
    tracing_subscriber::fmt()
        .with_writer(build_writer(file_writer, capture.clone()))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(build_filter(settings))
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(LogGuard {
        _file: guard,
        capture,
    })
}
