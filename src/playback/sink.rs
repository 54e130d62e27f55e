//! `rodio` implementation of the decoder collaborator.
//!
//! Preparation decodes the container headers synchronously and queues the
//! `Prepared` event, so the coordinator sees the same event flow as with a
//! truly asynchronous backend. Completion is detected by polling the sink.

use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::error::PlayerError;

use super::decoder::{Decoder, DecoderEvent, DecoderFactory};

/// Opens the default output device on first use and hands out sinks on it.
#[derive(Default)]
pub struct RodioFactory {
    stream: Option<OutputStream>,
}

impl DecoderFactory for RodioFactory {
    type Decoder = RodioDecoder;

    fn open(&mut self) -> Result<RodioDecoder, PlayerError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| PlayerError::OutputUnavailable(e.to_string()))?;
            // rodio logs to stderr when the stream is dropped, which garbles the TUI.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }

        let mixer = match &self.stream {
            Some(s) => s.mixer().clone(),
            None => return Err(PlayerError::OutputUnavailable("stream closed".into())),
        };
        Ok(RodioDecoder::new(mixer))
    }
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
fn create_sink_at(mixer: &Mixer, path: &Path, start_at: Duration) -> Result<(Sink, u64), PlayerError> {
    let file = File::open(path).map_err(|source| PlayerError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    // `try_from(File)` records the byte length and marks the source seekable.
    let decoded = rodio::Decoder::try_from(file).map_err(|e| PlayerError::PrepareFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let duration_ms = decoded
        .total_duration()
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let sink = Sink::connect_new(mixer);
    sink.pause();
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
    sink.append(decoded.skip_duration(start_at));
    Ok((sink, duration_ms))
}

pub struct RodioDecoder {
    mixer: Mixer,
    source: Option<PathBuf>,
    sink: Option<Sink>,
    duration_ms: u64,
    // Added to the sink's clock after a rebuild that skipped into the file.
    offset_ms: u64,
    events: VecDeque<DecoderEvent>,
    // Set by `start`, cleared by `stop`/`reset`; completion is only
    // reported for a sink that was actually started.
    started: bool,
    completed: bool,
}

impl RodioDecoder {
    fn new(mixer: Mixer) -> Self {
        Self {
            mixer,
            source: None,
            sink: None,
            duration_ms: 0,
            offset_ms: 0,
            events: VecDeque::new(),
            started: false,
            completed: false,
        }
    }
}

impl RodioDecoder {
    /// Replace the sink with a fresh one skipped to `position_ms`. The old sink
    /// is only stopped once the new one exists; on failure it keeps playing.
    fn rebuild_at(&mut self, position_ms: u64) -> Result<(), PlayerError> {
        let path = self.source.clone().ok_or(PlayerError::NoSource)?;
        let (new_sink, _) = create_sink_at(&self.mixer, &path, Duration::from_millis(position_ms))
            .map_err(|err| PlayerError::Seek(err.to_string()))?;

        if let Some(old) = self.sink.take() {
            if !old.is_paused() {
                new_sink.play();
            }
            old.stop();
        }
        self.sink = Some(new_sink);
        self.offset_ms = position_ms;
        Ok(())
    }
}

impl Decoder for RodioDecoder {
    fn set_source(&mut self, source: &Path) -> Result<(), PlayerError> {
        File::open(source).map_err(|e| PlayerError::SourceUnavailable {
            path: source.to_path_buf(),
            source: e,
        })?;
        self.source = Some(source.to_path_buf());
        Ok(())
    }

    fn prepare_async(&mut self) -> Result<(), PlayerError> {
        let path = self.source.clone().ok_or(PlayerError::NoSource)?;
        let (sink, duration_ms) = create_sink_at(&self.mixer, &path, Duration::ZERO)?;
        self.sink = Some(sink);
        self.duration_ms = duration_ms;
        self.offset_ms = 0;
        self.completed = false;
        self.events.push_back(DecoderEvent::Prepared);
        debug!("prepared {} ({} ms)", path.display(), duration_ms);
        Ok(())
    }

    fn start(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
            self.started = true;
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = &self.sink {
            s.stop();
        }
        self.started = false;
    }

    fn reset(&mut self) {
        self.stop();
        self.sink = None;
        self.source = None;
        self.duration_ms = 0;
        self.offset_ms = 0;
        self.events.clear();
        self.completed = false;
    }

    fn release(&mut self) {
        self.reset();
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), PlayerError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        let target = Duration::from_millis(position_ms);
        let Err(e) = sink.try_seek(target) else {
            self.offset_ms = 0;
            return Ok(());
        };

        // Not every format seeks in place; rebuild the sink and skip into the file.
        warn!("in-place seek failed ({e}), rebuilding sink");
        self.rebuild_at(position_ms)
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn current_position_ms(&self) -> u64 {
        self.sink
            .as_ref()
            .map(|s| self.offset_ms + s.get_pos().as_millis() as u64)
            .unwrap_or(0)
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn poll_event(&mut self) -> Option<DecoderEvent> {
        if let Some(ev) = self.events.pop_front() {
            return Some(ev);
        }
        let finished = self.started
            && !self.completed
            && self.sink.as_ref().map(|s| s.empty()).unwrap_or(false);
        if finished {
            self.completed = true;
            return Some(DecoderEvent::Completed);
        }
        None
    }
}
