use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults when the file is unreadable or invalid.
///
/// Returns the settings plus any warning worth logging once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

/// Emit the deferred config warning through the installed subscriber.
pub fn report(warning: Option<String>) {
    if let Some(msg) = warning {
        warn!("{msg}");
    }
}
