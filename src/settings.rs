use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "Select an SSH connection";

/// Optional user settings (loaded from ~/.config/sshclip/config.toml).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub title: String,
    /// ANSI 256-colour index used for the highlighted row.
    pub accent: u8,
    pub show_help: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            accent: 170,
            show_help: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    /// None when the configured level is not a valid `log` level name.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.level.parse().ok()
    }
}

pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sshclip")
        .join("config.toml")
}

/// Default location of the log file; the terminal is owned by the UI.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("sshclip").join("sshclip.log"))
}

/// Load settings. A missing file means defaults; an unreadable or malformed
/// one is an error the caller may downgrade to a warning.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
