//! Global configuration for the Workshop toolkit.
//!
//! A small TOML file holds user-wide settings:
//!
//! ```toml
//! # ~/.workshop/config.toml
//! index_url = "https://raw.example.com/mirror/repo.json"
//! duplicate_ids = "deny"   # warn | deny | allow
//! ```
//!
//! - `index_url` supplies the default index location when a command is not
//!   given one on the command line.
//! - `duplicate_ids` resolves the open question of colliding record ids:
//!   the format permits them, so the policy is configurable rather than
//!   hard-coded, defaulting to a non-fatal warning.
//!
//! The file location is `~/.workshop/config.toml`, overridable with the
//! `WORKSHOP_CONFIG` environment variable or the global `--config` flag.
//! A missing file simply yields the defaults.

use crate::constants::DEFAULT_INDEX_URL;
use crate::core::WorkshopError;
use crate::index::DuplicateIdPolicy;
use crate::utils::paths::validate_url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User-wide settings loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default index location (path or URL) used when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,

    /// How the loader treats records sharing an id.
    #[serde(default)]
    pub duplicate_ids: DuplicateIdPolicy,
}

impl GlobalConfig {
    /// The platform default config path, `~/.workshop/config.toml`.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::ConfigError`] when no home directory can be
    /// determined.
    pub fn default_path() -> Result<PathBuf, WorkshopError> {
        dirs::home_dir()
            .map(|home| home.join(".workshop").join("config.toml"))
            .ok_or_else(|| WorkshopError::ConfigError {
                message: "cannot determine home directory".to_string(),
            })
    }

    /// Resolve the config path: CLI override, then `WORKSHOP_CONFIG`, then
    /// the platform default.
    ///
    /// # Errors
    ///
    /// See [`Self::default_path`].
    pub fn resolve_path(cli_override: Option<&str>) -> Result<PathBuf, WorkshopError> {
        if let Some(path) = cli_override {
            return Ok(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("WORKSHOP_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        Self::default_path()
    }

    /// Load the config from a file. A missing file yields the defaults;
    /// a present-but-invalid file is an error, not a silent fallback.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::TomlError`] for syntax problems,
    /// [`WorkshopError::ConfigError`] for invalid values.
    pub fn load(path: &Path) -> Result<Self, WorkshopError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        if let Some(url) = &config.index_url
            && crate::source::is_remote(url)
        {
            validate_url(url).map_err(|reason| WorkshopError::ConfigError {
                message: format!("invalid index_url: {reason}"),
            })?;
        }

        Ok(config)
    }

    /// Load from the resolved path (see [`Self::resolve_path`]).
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_path`] and [`Self::load`].
    pub fn load_or_default(cli_override: Option<&str>) -> Result<Self, WorkshopError> {
        let path = Self::resolve_path(cli_override)?;
        Self::load(&path)
    }

    /// Pick the index location: explicit argument, then `index_url`, then
    /// the built-in default URL.
    #[must_use]
    pub fn resolve_index<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit.or(self.index_url.as_deref()).unwrap_or(DEFAULT_INDEX_URL)
    }
}
