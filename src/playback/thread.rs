use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::coordinator::Coordinator;
use super::decoder::DecoderFactory;
use super::types::{Notice, PlaybackHandle, PlayerCmd};

/// Upper bound on how long the loop sleeps when no timer is due, so
/// completion is noticed promptly even while paused or idle.
const IDLE_POLL: Duration = Duration::from_millis(200);

pub(super) struct ThreadConfig {
    pub refresh_interval: Duration,
    pub autoplay_on_ready: bool,
}

/// Spawn the coordinator thread. `make_factory` runs on the new thread, so
/// the output device is opened (and owned) there.
pub(super) fn spawn_coordinator_thread<F, M>(
    make_factory: M,
    rx: Receiver<PlayerCmd>,
    playback: PlaybackHandle,
    notices: Sender<Notice>,
    cfg: ThreadConfig,
) -> JoinHandle<()>
where
    F: DecoderFactory + 'static,
    M: FnOnce() -> F + Send + 'static,
{
    thread::spawn(move || {
        let mut coordinator = Coordinator::new(
            make_factory(),
            cfg.refresh_interval,
            cfg.autoplay_on_ready,
            playback,
            notices,
        );
        run_loop(&mut coordinator, &rx);
        coordinator.shutdown();
    })
}

/// Serve commands until `Shutdown` or until every sender is gone.
pub(super) fn run_loop<F: DecoderFactory>(coordinator: &mut Coordinator<F>, rx: &Receiver<PlayerCmd>) {
    loop {
        let wait = coordinator
            .time_until_tick(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));

        match rx.recv_timeout(wait) {
            Ok(PlayerCmd::Shutdown) => {
                info!("shutdown requested");
                break;
            }
            Ok(cmd) => {
                debug!("command: {cmd:?}");
                if let Err(e) = apply(coordinator, cmd) {
                    coordinator.report(&e);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        coordinator.tick(Instant::now());
    }
}

fn apply<F: DecoderFactory>(
    coordinator: &mut Coordinator<F>,
    cmd: PlayerCmd,
) -> Result<(), crate::error::PlayerError> {
    let now = Instant::now();
    match cmd {
        PlayerCmd::SetQueue(tracks) => {
            coordinator.set_queue(tracks);
            Ok(())
        }
        PlayerCmd::Play(track) => coordinator.play(track, now),
        PlayerCmd::TogglePlayPause => coordinator.toggle_play_pause(now),
        PlayerCmd::Next => coordinator.next(now),
        PlayerCmd::Previous => coordinator.previous(now),
        PlayerCmd::Seek(ms) => coordinator.seek(ms),
        PlayerCmd::Shutdown => Ok(()),
    }
}
