//! Project context: root discovery and YAML configuration access
//!
//! A project is the directory tree stagehand operates on. Its root is the
//! nearest ancestor containing `.stagehand/config.yml`; the config file
//! supplies the application type and per-command parameter tables. Tools
//! additionally read their own project-local files (`.lando.yml`,
//! `composer.json`) through [`Project::load_config_file`], which lets the
//! caller pick the severity of a missing file - a project that simply does
//! not use a tool is not an error.

use crate::errors::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn, Level};

/// Directory under the project root holding stagehand's own config
pub const CONFIG_DIR: &str = ".stagehand";

/// Project config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yml";

/// A discovered project root plus its parsed configuration
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: serde_yaml::Value,
}

impl Project {
    /// Walk up from `start` to the nearest directory containing
    /// `.stagehand/config.yml`
    pub fn find_root(start: &Path) -> Result<PathBuf> {
        let canonical = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
        let mut current = canonical.as_path();

        loop {
            if current.join(CONFIG_DIR).join(CONFIG_FILE).is_file() {
                debug!("Found project root: {}", current.display());
                return Ok(current.to_path_buf());
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => {
                    return Err(ConfigError::RootNotFound {
                        start: canonical.display().to_string(),
                    }
                    .into())
                }
            }
        }
    }

    /// Load the project rooted at `root`
    ///
    /// A missing or empty config file is warned about, not fatal: the
    /// project loads with an empty configuration and tools that need keys
    /// from it stay disabled.
    pub fn load(root: PathBuf) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
        let config = match fs::read_to_string(&config_path) {
            Ok(text) => serde_yaml::from_str(&text)?,
            Err(e) => {
                warn!("Could not read {}: {}", config_path.display(), e);
                serde_yaml::Value::Null
            }
        };
        Ok(Self { root, config })
    }

    /// Discover and load the project containing the current directory
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        let root = Self::find_root(&cwd)?;
        Self::load(root)
    }

    /// The project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `subdir` onto the project root
    pub fn path(&self, subdir: &str) -> PathBuf {
        if subdir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(subdir)
        }
    }

    /// String-valued top-level config key, if present
    pub fn config_string(&self, key: &str) -> Option<String> {
        self.config
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Mapping-valued top-level config key, if present
    pub fn config_table(&self, key: &str) -> Option<&serde_yaml::Mapping> {
        self.config.get(key).and_then(|v| v.as_mapping())
    }

    /// Read and parse a project-relative YAML file
    ///
    /// `missing_severity` controls how a missing or unreadable file is
    /// reported; `None` suppresses the message entirely so tools can probe
    /// for files the project may legitimately not have.
    pub fn load_config_file(
        &self,
        name: &str,
        missing_severity: Option<Level>,
    ) -> Option<serde_yaml::Value> {
        let path = self.root.join(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log_at(missing_severity, &format!("Could not read {}: {}", path.display(), e));
                return None;
            }
        };
        match serde_yaml::from_str::<serde_yaml::Value>(&text) {
            Ok(serde_yaml::Value::Null) => {
                log_at(missing_severity, &format!("{} is empty", path.display()));
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                log_at(missing_severity, &format!("Could not parse {}: {}", path.display(), e));
                None
            }
        }
    }
}

fn log_at(severity: Option<Level>, message: &str) {
    match severity {
        Some(Level::ERROR) => tracing::error!("{}", message),
        Some(Level::WARN) => tracing::warn!("{}", message),
        Some(Level::INFO) => tracing::info!("{}", message),
        Some(Level::DEBUG) => tracing::debug!("{}", message),
        Some(Level::TRACE) => tracing::trace!("{}", message),
        None => {}
    }
}
