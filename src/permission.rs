//! Storage access gate.
//!
//! The library is only listed once read access to the music directory is
//! established. Access is checked once at startup and, when missing,
//! requested exactly once.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use tracing::{info, warn};

/// How long [`ensure_access`] waits for a gate to answer.
pub const ACCESS_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback receiving the outcome of an access request: `true` when granted.
pub type AccessCallback = Box<dyn FnOnce(bool) + Send>;

pub trait AccessGate {
    fn has_access(&self) -> bool;

    /// Ask for access. `on_result` is invoked at most once.
    fn request_access(&mut self, on_result: AccessCallback);
}

/// Desktop gate: access means the music directory can be listed.
///
/// A directory that does not exist is not a permission problem; the scanner
/// reports it separately.
#[derive(Debug, Clone)]
pub struct DirectoryAccess {
    dir: PathBuf,
}

impl DirectoryAccess {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl AccessGate for DirectoryAccess {
    fn has_access(&self) -> bool {
        match std::fs::read_dir(&self.dir) {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => false,
            Err(e) => {
                warn!("cannot check access to {}: {e}", self.dir.display());
                true
            }
        }
    }

    fn request_access(&mut self, on_result: AccessCallback) {
        // Nothing to prompt for on a desktop: the answer is whatever the
        // filesystem says now.
        on_result(self.has_access());
    }
}

/// Check access and, if it is missing, request it once.
pub fn ensure_access<G: AccessGate + ?Sized>(gate: &mut G) -> bool {
    ensure_access_within(gate, ACCESS_REQUEST_TIMEOUT)
}

/// [`ensure_access`] with an explicit bound on how long to wait for the answer.
pub fn ensure_access_within<G: AccessGate + ?Sized>(gate: &mut G, timeout: Duration) -> bool {
    if gate.has_access() {
        return true;
    }

    info!("storage access missing, requesting");
    let (tx, rx) = mpsc::channel();
    gate.request_access(Box::new(move |granted| {
        let _ = tx.send(granted);
    }));

    // No answer, whether dropped or overdue, counts as a denial.
    let granted = match rx.recv_timeout(timeout) {
        Ok(granted) => granted,
        Err(RecvTimeoutError::Timeout) => {
            warn!("no answer to the access request after {timeout:?}");
            false
        }
        Err(RecvTimeoutError::Disconnected) => false,
    };
    if granted {
        info!("storage access granted");
    } else {
        warn!("storage access denied");
    }
    granted
}
