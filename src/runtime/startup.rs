use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use tracing::info;

use crate::app::App;
use crate::config;
use crate::library::{ScanResult, spawn_scan};
use crate::permission::{AccessGate, ensure_access};

/// Check storage access once and, when granted, start the background scan.
///
/// On denial the app is left with an empty list and no scan is started.
pub fn start_library<G: AccessGate + ?Sized>(
    app: &mut App,
    gate: &mut G,
    dir: &Path,
    settings: &config::Settings,
) -> Option<Receiver<ScanResult>> {
    if !ensure_access(gate) {
        app.deny_access(Instant::now());
        return None;
    }
    app.grant_access();

    info!(
        "scanning {} with the {:?} backend",
        dir.display(),
        settings.library.backend
    );
    Some(spawn_scan(
        dir.to_path_buf(),
        settings.library.clone(),
        settings.artwork_base(),
    ))
}
