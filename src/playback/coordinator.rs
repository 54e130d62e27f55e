//! The playback coordinator: one decoder session, one queue, one snapshot.
//!
//! State machine: `Idle -> Preparing -> Playing <-> Paused`, and on natural
//! completion back to `Preparing` for the next entry (or `Idle` when the
//! queue is empty). The coordinator never holds more than one open decoder
//! handle: any previous handle is stopped and released before a new one is
//! opened.
//!
//! The position timer runs iff the track is playing.

use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::error::PlayerError;
use crate::library::Track;

use super::decoder::{Decoder, DecoderEvent, DecoderFactory};
use super::queue::Queue;
use super::timer::PositionTimer;
use super::types::{Notice, PlaybackHandle, PlaybackSnapshot, PlayerStatus};

pub struct Coordinator<F: DecoderFactory> {
    factory: F,
    decoder: Option<F::Decoder>,
    /// Track whose source is loaded in `decoder`.
    loaded: Option<Track>,
    status: PlayerStatus,
    queue: Queue,
    timer: PositionTimer,
    autoplay_on_ready: bool,
    playback: PlaybackHandle,
    notices: Sender<Notice>,
}

impl<F: DecoderFactory> Coordinator<F> {
    pub fn new(
        factory: F,
        refresh_interval: Duration,
        autoplay_on_ready: bool,
        playback: PlaybackHandle,
        notices: Sender<Notice>,
    ) -> Self {
        Self {
            factory,
            decoder: None,
            loaded: None,
            status: PlayerStatus::Idle,
            queue: Queue::default(),
            timer: PositionTimer::new(refresh_interval),
            autoplay_on_ready,
            playback,
            notices,
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// How long the owning loop may sleep before the next timer tick.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        debug!("queue replaced with {} tracks", tracks.len());
        self.queue.replace(tracks);
    }

    /// Load `track` and request preparation. Playback starts once the decoder
    /// reports ready. Errors leave the coordinator `Idle`.
    pub fn play(&mut self, track: Track, now: Instant) -> Result<(), PlayerError> {
        self.release_decoder();

        if let Some(i) = self.queue.position_of(track.id) {
            self.queue.seek_to(i);
        }

        info!("loading {}", track.location.display());
        self.update(|s| {
            s.is_playing = false;
            s.position_ms = 0;
            s.duration_ms = 0;
            s.status = PlayerStatus::Preparing;
        });
        self.status = PlayerStatus::Preparing;
        self.loaded = Some(track.clone());

        if let Err(e) = self.load(&track) {
            self.release_decoder();
            self.set_idle();
            return Err(e);
        }

        // Some backends finish preparing immediately; react before returning.
        self.pump_events(now);
        Ok(())
    }

    fn load(&mut self, track: &Track) -> Result<(), PlayerError> {
        let mut decoder = self.factory.open()?;
        let result = decoder
            .set_source(&track.location)
            .and_then(|_| decoder.prepare_async());
        self.decoder = Some(decoder);
        result
    }

    pub fn toggle_play_pause(&mut self, now: Instant) -> Result<(), PlayerError> {
        match self.status {
            PlayerStatus::Playing => {
                if let Some(d) = self.decoder.as_mut() {
                    d.pause();
                }
                self.timer.stop();
                self.status = PlayerStatus::Paused;
                let position_ms = self.decoder_position();
                self.update(|s| {
                    s.is_playing = false;
                    s.position_ms = position_ms;
                    s.status = PlayerStatus::Paused;
                });
                Ok(())
            }
            PlayerStatus::Paused => {
                self.resume(now);
                Ok(())
            }
            PlayerStatus::Idle | PlayerStatus::Preparing => match self.queue.current().cloned() {
                Some(track) => self.play(track, now),
                None => Ok(()),
            },
        }
    }

    pub fn next(&mut self, now: Instant) -> Result<(), PlayerError> {
        match self.queue.advance().cloned() {
            Some(track) => self.play(track, now),
            None => Ok(()),
        }
    }

    pub fn previous(&mut self, now: Instant) -> Result<(), PlayerError> {
        match self.queue.retreat().cloned() {
            Some(track) => self.play(track, now),
            None => Ok(()),
        }
    }

    /// Jump to `position_ms` and publish it right away, without waiting for a tick.
    pub fn seek(&mut self, position_ms: u64) -> Result<(), PlayerError> {
        if !matches!(self.status, PlayerStatus::Playing | PlayerStatus::Paused) {
            return Ok(());
        }
        let duration = self.effective_duration();
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(());
        };

        let target = if duration > 0 {
            position_ms.min(duration)
        } else {
            position_ms
        };
        decoder.seek(target)?;
        self.update(|s| s.position_ms = target);
        Ok(())
    }

    /// Drain decoder events and fire the position timer if it is due.
    pub fn tick(&mut self, now: Instant) {
        self.pump_events(now);

        if self.timer.fire_if_due(now) {
            let position_ms = self.decoder_position();
            self.update(|s| s.position_ms = position_ms);
        }
    }

    pub fn shutdown(&mut self) {
        self.release_decoder();
        self.set_idle();
        info!("coordinator shut down");
    }

    fn pump_events(&mut self, now: Instant) {
        loop {
            let Some(event) = self.decoder.as_mut().and_then(|d| d.poll_event()) else {
                break;
            };
            self.on_decoder_event(event, now);
        }
    }

    fn on_decoder_event(&mut self, event: DecoderEvent, now: Instant) {
        match event {
            DecoderEvent::Prepared => self.on_prepared(now),
            DecoderEvent::Completed => {
                debug!("track completed");
                if self.queue.is_empty() {
                    self.release_decoder();
                    self.set_idle();
                } else if let Err(e) = self.next(now) {
                    self.report(&e);
                }
            }
            DecoderEvent::Error { what, extra } => {
                let err = PlayerError::DecoderRuntime { what, extra };
                error!("{err}");
                // Queue and cursor stay where they are; the next play/pause re-prepares.
                self.release_decoder();
                self.status = PlayerStatus::Idle;
                self.update(|s| {
                    s.is_playing = false;
                    s.status = PlayerStatus::Idle;
                });
                let _ = self.notices.send(Notice::DecoderError(err.to_string()));
            }
        }
    }

    fn on_prepared(&mut self, now: Instant) {
        if self.status != PlayerStatus::Preparing {
            warn!("ignoring ready signal in state {:?}", self.status);
            return;
        }
        let duration_ms = self.effective_duration();
        let track = self.loaded.clone();
        debug!("prepared, duration {duration_ms} ms");

        if let Some(t) = &track {
            let _ = self.notices.send(Notice::NowPlaying(t.title.clone()));
        }
        self.status = PlayerStatus::Paused;
        self.update(|s| {
            s.duration_ms = duration_ms;
            s.current = track;
            s.position_ms = 0;
            s.status = PlayerStatus::Paused;
        });

        if self.autoplay_on_ready {
            self.resume(now);
        }
    }

    fn resume(&mut self, now: Instant) {
        if let Some(d) = self.decoder.as_mut() {
            d.start();
            if !d.is_playing() {
                warn!("decoder did not start playing");
            }
        }
        self.timer.start(now);
        self.status = PlayerStatus::Playing;
        self.update(|s| {
            s.is_playing = true;
            s.status = PlayerStatus::Playing;
        });
    }

    fn release_decoder(&mut self) {
        self.timer.stop();
        if let Some(mut d) = self.decoder.take() {
            d.stop();
            d.reset();
            d.release();
        }
    }

    fn set_idle(&mut self) {
        self.status = PlayerStatus::Idle;
        self.loaded = None;
        self.update(|s| {
            s.current = None;
            s.is_playing = false;
            s.position_ms = 0;
            s.duration_ms = 0;
            s.status = PlayerStatus::Idle;
        });
    }

    /// The decoder's duration, or the indexed one when the container has none.
    fn effective_duration(&self) -> u64 {
        let reported = self.decoder.as_ref().map(|d| d.duration_ms()).unwrap_or(0);
        if reported > 0 {
            reported
        } else {
            self.loaded.as_ref().map(|t| t.duration_ms).unwrap_or(0)
        }
    }

    fn decoder_position(&self) -> u64 {
        self.decoder
            .as_ref()
            .map(|d| d.current_position_ms())
            .unwrap_or(0)
    }

    /// Log `err` and surface it as a notice.
    pub fn report(&self, err: &PlayerError) {
        warn!("{err}");
        let _ = self.notices.send(Notice::PlaybackFailed(err.to_string()));
    }

    fn update(&self, f: impl FnOnce(&mut PlaybackSnapshot)) {
        if let Ok(mut s) = self.playback.lock() {
            f(&mut s);
        }
    }
}
