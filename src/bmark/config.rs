use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const CONFIG_FILENAME: &str = "config.json";

/// Environment variable overriding the store root.
pub const STORE_ENV: &str = "BOOKMARKS_DIR";

const DEFAULT_DIRNAME: &str = ".bookmarks.d";

/// Store policy, kept in `config.json` at the store root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Treat folder path segments as implicit tags for `list --tag`,
    /// `tags`, and search.
    #[serde(default = "default_folder_tags")]
    pub folder_tags: bool,
}

fn default_folder_tags() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { folder_tags: true }
    }
}

impl StoreConfig {
    /// Load from the store root, or defaults if no config file exists.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let path = root.as_ref().join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, root: P) -> Result<()> {
        let root = root.as_ref();
        if !root.exists() {
            fs::create_dir_all(root)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(root.join(CONFIG_FILENAME), content)?;
        Ok(())
    }
}

/// Resolve the store root: explicit flag, then `$BOOKMARKS_DIR`, then
/// `~/.bookmarks.d`.
pub fn resolve_root(flag: Option<&Path>) -> PathBuf {
    if let Some(explicit) = flag {
        return explicit.to_path_buf();
    }
    if let Some(from_env) = env::var_os(STORE_ENV) {
        if !from_env.is_empty() {
            return PathBuf::from(from_env);
        }
    }
    UserDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_DIRNAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRNAME))
}
