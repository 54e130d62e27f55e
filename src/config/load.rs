use std::{env, path::PathBuf};

use super::schema::Settings;

const APP_DIR: &str = "khmusic";

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `KHMUSIC__`), on top of the struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("KHMUSIC")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.position_refresh_ms == 0 {
            return Err("playback.position_refresh_ms must be >= 1".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }

    /// The music directory: `library.music_dir`, else `$XDG_MUSIC_DIR`, else `~/Music`.
    pub fn music_dir(&self) -> PathBuf {
        if let Some(dir) = &self.library.music_dir {
            return dir.clone();
        }
        if let Some(xdg) = env::var_os("XDG_MUSIC_DIR") {
            return PathBuf::from(xdg);
        }
        home_dir()
            .map(|h| h.join("Music"))
            .unwrap_or_else(|| PathBuf::from("Music"))
    }

    /// Base for album artwork locators: `library.artwork_base`, else the XDG cache dir.
    pub fn artwork_base(&self) -> PathBuf {
        if let Some(base) = &self.library.artwork_base {
            return base.clone();
        }
        xdg_dir("XDG_CACHE_HOME", ".cache")
            .map(|d| d.join(APP_DIR).join("albumart"))
            .unwrap_or_else(|| PathBuf::from("albumart"))
    }

    /// Directory for log files: `logging.directory`, else the XDG state dir.
    pub fn log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.logging.directory {
            return dir.clone();
        }
        xdg_dir("XDG_STATE_HOME", ".local/state")
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

/// Resolve the config path from `KHMUSIC_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("KHMUSIC_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/khmusic/config.toml`
/// or `~/.config/khmusic/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join(APP_DIR).join("config.toml"))
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        home_dir().map(|h| h.join(home_relative))
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
