//! Per-run generation settings consumed by the template locator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Trait for reading environment overrides, allowing dependency injection for testing
pub trait ConfigReader {
    fn template_dir(&self) -> Option<String>;
    fn library(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvConfigReader;

impl ConfigReader for EnvConfigReader {
    fn template_dir(&self) -> Option<String> {
        std::env::var("TEMPLAR_TEMPLATE_DIR").ok()
    }

    fn library(&self) -> Option<String> {
        std::env::var("TEMPLAR_LIBRARY").ok()
    }
}

/// Locations searched when a template is resolved.
///
/// `template_dir` is a filesystem folder supplied by the user. The two
/// `*_template_dir` fields name folders inside the bundled resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// User template folder on disk
    pub template_dir: PathBuf,
    /// Optional library flavor, looked up under `libraries/<library>`
    pub library: Option<String>,
    /// Bundled folder holding the templates of the current target
    pub embedded_template_dir: String,
    /// Bundled folder shared by all targets, searched last
    pub common_template_dir: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            library: None,
            embedded_template_dir: String::new(),
            common_template_dir: "_common".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Create a config for the given user folder and bundled target folder
    pub fn new(template_dir: impl Into<PathBuf>, embedded_template_dir: impl Into<String>) -> Self {
        Self {
            template_dir: template_dir.into(),
            embedded_template_dir: embedded_template_dir.into(),
            ..Default::default()
        }
    }

    /// Set the library flavor
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Set the shared bundled folder
    pub fn with_common_template_dir(mut self, dir: impl Into<String>) -> Self {
        self.common_template_dir = dir.into();
        self
    }

    /// The library flavor, or `None` when unset or empty
    pub fn library(&self) -> Option<&str> {
        self.library.as_deref().filter(|l| !l.is_empty())
    }

    /// Load a config from a YAML (`.yml`/`.yaml`) or TOML (`.toml`) file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(Error::config(format!(
                "Unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Find a config file in the standard locations, falling back to defaults
    pub fn discover() -> Result<Self> {
        let mut candidates = vec![PathBuf::from("templar.toml"), PathBuf::from("templar.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("templar").join("config.toml"));
        }

        match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => {
                debug!(path = %path.display(), "Loading generation config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply overrides from the given reader
    pub fn with_overrides(mut self, reader: &dyn ConfigReader) -> Self {
        if let Some(dir) = reader.template_dir() {
            self.template_dir = PathBuf::from(dir);
        }
        if let Some(library) = reader.library() {
            self.library = Some(library);
        }
        self
    }
}
