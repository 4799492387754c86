use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bookmarker_core::DEFAULT_FOLDER_NAME;
use bookmarker_engine::{
    AdbSettings, EngineConfig, SourceKind, DEFAULT_BROWSER_FILTER, DEFAULT_BROWSER_PACKAGE,
    DEFAULT_PACING_MS,
};
use bookmarker_logging::marker_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_DIR_NAME: &str = "shortcut-bookmarker";
const CONFIG_FILENAME: &str = "config.ron";
const FALLBACK_EXPORT_DIR: &str = "exports";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Settings read from `config.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub adb_path: String,
    pub device_serial: Option<String>,
    pub browser_package: String,
    pub browser_filter: String,
    pub pacing_ms: u64,
    pub folder_name: String,
    pub export_dir: Option<PathBuf>,
    pub command_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            device_serial: None,
            browser_package: DEFAULT_BROWSER_PACKAGE.to_string(),
            browser_filter: DEFAULT_BROWSER_FILTER.to_string(),
            pacing_ms: DEFAULT_PACING_MS,
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
            export_dir: None,
            command_timeout_secs: 15,
        }
    }
}

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub adb_path: Option<String>,
    pub device_serial: Option<String>,
    pub browser_package: Option<String>,
    pub browser_filter: Option<String>,
    pub pacing_ms: Option<u64>,
    pub folder_name: Option<String>,
    pub export_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `explicit` when given, else the per-user config file.
    ///
    /// A missing per-user file yields defaults. A missing explicit file is an
    /// error since the user asked for it by name.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        marker_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(adb_path) = overrides.adb_path {
            self.adb_path = adb_path;
        }
        if overrides.device_serial.is_some() {
            self.device_serial = overrides.device_serial;
        }
        if let Some(package) = overrides.browser_package {
            self.browser_package = package;
        }
        if let Some(filter) = overrides.browser_filter {
            self.browser_filter = filter;
        }
        if let Some(pacing_ms) = overrides.pacing_ms {
            self.pacing_ms = pacing_ms;
        }
        if let Some(folder_name) = overrides.folder_name {
            self.folder_name = folder_name;
        }
        if overrides.export_dir.is_some() {
            self.export_dir = overrides.export_dir;
        }
    }

    /// Configured export directory, else the user's Downloads, else `./exports`.
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_EXPORT_DIR))
    }

    pub fn engine_config(&self, source: SourceKind, handle_interrupt: bool) -> EngineConfig {
        let mut config = EngineConfig::default_with_export_dir(self.resolved_export_dir());
        config.adb = AdbSettings {
            program: self.adb_path.clone(),
            serial: self.device_serial.clone(),
            command_timeout: Duration::from_secs(self.command_timeout_secs),
        };
        config.source = source;
        config.browser_package = self.browser_package.clone();
        config.browser_filter = self.browser_filter.clone();
        config.pacing = Duration::from_millis(self.pacing_ms);
        config.handle_interrupt = handle_interrupt;
        config
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}
