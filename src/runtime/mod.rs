use std::io::Stdout;
use std::time::Duration;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::Args;
use crate::app::App;
use crate::permission::DirectoryAccess;
use crate::playback::Player;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run(args: &Args) -> anyhow::Result<()> {
    let (mut settings, config_warning) = settings::load_settings();
    if let Some(dir) = &args.dir {
        settings.library.music_dir = Some(dir.clone());
    }
    if let Some(backend) = args.backend {
        settings.library.backend = backend;
    }

    if args.print_config {
        print!(
            "{}",
            toml::to_string_pretty(&settings).context("serializing settings")?
        );
        return Ok(());
    }

    let log = logging::init_logging(&settings.logging, &settings.log_dir(), args.dev)?;
    settings::report(config_warning);
    info!("khmusic {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = crate::config::resolve_config_path() {
        info!("config file: {}", path.display());
    }

    let dir = settings.music_dir();
    let player = Player::new(&settings.playback);
    let mut app = App::new(Duration::from_millis(settings.ui.notice_ms));
    app.set_current_dir(dir.display().to_string());

    let mut gate = DirectoryAccess::new(&dir);
    let scan_rx = startup::start_library(&mut app, &mut gate, &dir, &settings);

    let mut terminal = enter_terminal().context("setting up the terminal")?;

    let run_result = {
        let mut state = event_loop::EventLoopState::new(scan_rx);
        event_loop::run(&mut terminal, &settings, &mut app, &player, &mut state)
    };

    let restore_result = leave_terminal(&mut terminal);
    player.shutdown();
    info!("khmusic exiting");

    log.replay_to_stderr();
    run_result.and(restore_result)
}

fn enter_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn leave_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
