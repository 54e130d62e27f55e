use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::PlaybackSettings;

use super::decoder::DecoderFactory;
use super::sink::RodioFactory;
use super::thread::{ThreadConfig, spawn_coordinator_thread};
use super::types::{Notice, PlaybackHandle, PlaybackSnapshot, PlayerCmd};

/// Handle owned by the UI: a command sender in, a snapshot and notices out.
pub struct Player {
    tx: Sender<PlayerCmd>,
    playback: PlaybackHandle,
    notices: Mutex<Receiver<Notice>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start a coordinator backed by the default audio output.
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self::with_factory(settings, RodioFactory::default)
    }

    pub fn with_factory<F, M>(settings: &PlaybackSettings, make_factory: M) -> Self
    where
        F: DecoderFactory + 'static,
        M: FnOnce() -> F + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let (notice_tx, notice_rx) = mpsc::channel::<Notice>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackSnapshot::default()));

        let join = spawn_coordinator_thread(
            make_factory,
            rx,
            playback.clone(),
            notice_tx,
            ThreadConfig {
                refresh_interval: Duration::from_millis(settings.position_refresh_ms.max(1)),
                autoplay_on_ready: settings.autoplay_on_ready,
            },
        );

        Self {
            tx,
            playback,
            notices: Mutex::new(notice_rx),
            join: Mutex::new(Some(join)),
        }
    }

    /// Copy of the latest published state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.playback
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), mpsc::SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Notices raised since the last call.
    pub fn drain_notices(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(rx) => rx.try_iter().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Release the decoder and wait for the coordinator thread to exit.
    pub fn shutdown(&self) {
        let _ = self.send(PlayerCmd::Shutdown);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}
