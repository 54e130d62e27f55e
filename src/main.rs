use std::path::PathBuf;

use clap::Parser;

mod app;
mod config;
mod error;
mod library;
mod permission;
mod playback;
mod runtime;
mod ui;

use config::LibraryBackend;

#[derive(Parser, Debug)]
#[command(name = "khmusic", version)]
#[command(about = "Scan a music folder, pick a song, play it")]
pub struct Args {
    /// Music directory (overrides `library.music_dir`)
    pub dir: Option<PathBuf>,

    /// How to list the library
    #[arg(long, value_enum)]
    pub backend: Option<LibraryBackend>,

    /// Replay the session log on stderr after the TUI exits
    #[arg(long)]
    pub dev: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    runtime::run(&args)
}
