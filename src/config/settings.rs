//! Application settings and paths.
//!
//! Settings are an optional JSON file supplying defaults for the scan flags.
//! The file lives in the XDG config directory unless a path is given.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use crate::scanner::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/tcpsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("", "", "tcpsweep").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Defaults for a scan, overridable from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Port range expression; empty means every port.
    pub ports: String,
    /// Connect timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum simultaneous connection attempts.
    pub parallel: usize,
    /// Services file used instead of the bundled table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services_file: Option<PathBuf>,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ports: String::new(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            parallel: DEFAULT_CONCURRENCY,
            services_file: None,
            output: OutputFormat::Plain,
        }
    }
}

impl Settings {
    /// Load settings from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file, or a platform
    /// without a config directory, yields the defaults.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let file = match Paths::discover() {
            Ok(paths) => paths.settings_file(),
            Err(_) => return Ok(Self::default()),
        };
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
