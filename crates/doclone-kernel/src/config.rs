//! User configuration.
//!
//! Read from `config.ron` under the platform config dir unless a path is
//! given explicitly. Every field is optional:
//!
//! ```ron
//! (
//!     data_dir: Some("/home/amy/.local/share/doclone"),
//!     user: Some("amy"),
//!     clone_suffix: " - Clone",
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocloneError, DocloneResult};
use crate::registry::DEFAULT_CLONE_SUFFIX;

/// doclone configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where documents and the registry database live.
    pub data_dir: Option<PathBuf>,
    /// Registry owner; defaults to the OS user name.
    pub user: Option<String>,
    /// Appended to the master's name when a clone creates its own document.
    pub clone_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            user: None,
            clone_suffix: DEFAULT_CLONE_SUFFIX.to_string(),
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("doclone").join("config.ron"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> DocloneResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        let text = fs::read_to_string(&path)
            .map_err(|e| DocloneError::config(format!("{}: {e}", path.display())))?;
        let config = Self::from_ron(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse a RON document.
    pub fn from_ron(text: &str) -> DocloneResult<Self> {
        ron::from_str(text).map_err(|e| DocloneError::config(e.to_string()))
    }

    /// Render as pretty RON.
    pub fn to_ron(&self) -> DocloneResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| DocloneError::config(e.to_string()))
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|p| p.join("doclone")))
            .unwrap_or_else(|| PathBuf::from(".doclone"))
    }

    /// Directory holding one JSON file per document.
    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir().join("documents")
    }

    /// SQLite database holding clone records.
    pub fn registry_db(&self) -> PathBuf {
        self.data_dir().join("registry.db")
    }

    /// Resolved registry owner.
    pub fn user(&self) -> String {
        self.user.clone().unwrap_or_else(whoami::username)
    }
}
