//! Run a scan off the UI thread and hand the result back exactly once.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::warn;

use crate::config::LibrarySettings;
use crate::error::ScanError;

use super::Track;

pub type ScanResult = Result<Vec<Track>, ScanError>;

pub fn spawn_scan(
    dir: PathBuf,
    settings: LibrarySettings,
    artwork_base: PathBuf,
) -> Receiver<ScanResult> {
    let (tx, rx) = mpsc::channel::<ScanResult>();
    thread::spawn(move || {
        let result = super::scan(&dir, &settings, &artwork_base);
        if tx.send(result).is_err() {
            warn!("scan of {} finished after the UI went away", dir.display());
        }
    });
    rx
}
