use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::config;
use crate::library::ScanResult;
use crate::playback::{Notice, Player, PlayerCmd};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Pending background scan; dropped once its single result arrived.
    scan_rx: Option<Receiver<ScanResult>>,
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

impl EventLoopState {
    pub fn new(scan_rx: Option<Receiver<ScanResult>>) -> Self {
        Self {
            scan_rx,
            pending_gg: false,
        }
    }
}

/// What a key press asks the loop to do.
#[derive(Debug)]
enum KeyAction {
    Nothing,
    Send(PlayerCmd),
    Quit,
}

impl From<Option<PlayerCmd>> for KeyAction {
    fn from(cmd: Option<PlayerCmd>) -> Self {
        cmd.map_or(KeyAction::Nothing, KeyAction::Send)
    }
}

/// Main terminal event loop: handles input, drawing, and sync with the
/// coordinator. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    let scrub_quiet = Duration::from_millis(settings.controls.scrub_commit_ms);

    loop {
        let now = Instant::now();

        if let Some(cmd) = poll_scan(app, state, now) {
            send(player, cmd);
        }

        for notice in player.drain_notices() {
            app.push_notice(&notice, now);
        }
        app.sync_playback(player.snapshot());

        if let Some(cmd) = app.release_slider_if_idle(now, scrub_quiet) {
            send(player, cmd);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls, now))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, settings, app, state, Instant::now()) {
                    KeyAction::Nothing => {}
                    KeyAction::Send(cmd) => send(player, cmd),
                    KeyAction::Quit => break,
                }
            }
        }
    }

    Ok(())
}

fn send(player: &Player, cmd: PlayerCmd) {
    debug!("sending {cmd:?}");
    if let Err(e) = player.send(cmd) {
        warn!("playback thread is gone: {e}");
    }
}

/// Pick up the scan result if it has arrived. Returns the queue update.
fn poll_scan(app: &mut App, state: &mut EventLoopState, now: Instant) -> Option<PlayerCmd> {
    let rx = state.scan_rx.as_ref()?;
    match rx.try_recv() {
        Ok(result) => {
            state.scan_rx = None;
            app.apply_scan_result(result, now)
        }
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            state.scan_rx = None;
            warn!("scanner exited without a result");
            app.push_notice(&Notice::ScanFailed("scanner stopped".into()), now);
            None
        }
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
    now: Instant,
) -> KeyAction {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Esc if app.metadata_window => {
            app.toggle_metadata_window();
            KeyAction::Nothing
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            KeyAction::Nothing
        }
        KeyCode::Char('G') => {
            app.select_last();
            KeyAction::Nothing
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.next();
            KeyAction::Nothing
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prev();
            KeyAction::Nothing
        }
        // Enter during a scrub commits it instead of switching tracks.
        KeyCode::Enter if app.slider.is_dragging() => app.release_slider().into(),
        KeyCode::Enter => app.play_selected().into(),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_play_pause().into(),
        KeyCode::Char('l') => app.skip_next().into(),
        KeyCode::Char('h') => app.skip_prev().into(),
        KeyCode::Char('L') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            app.drag_slider_by(secs, now);
            KeyAction::Nothing
        }
        KeyCode::Char('H') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            app.drag_slider_by(-secs, now);
            KeyAction::Nothing
        }
        KeyCode::Char('K') => {
            app.toggle_metadata_window();
            KeyAction::Nothing
        }
        _ => KeyAction::Nothing,
    }
}
