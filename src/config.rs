use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::export::DEFAULT_FILE_NAME;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub export: ExportConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Report export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for downloaded reports.
    pub dir: Option<PathBuf>,
    /// File name for downloaded reports.
    pub file_name: String,
    /// Clipboard command override, program followed by its arguments.
    pub clipboard_command: Option<Vec<String>>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            clipboard_command: None,
        }
    }
}

impl ExportConfig {
    /// Resolved export directory (override, documents dir, or cwd).
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/msn-eval/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("msn-eval").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
