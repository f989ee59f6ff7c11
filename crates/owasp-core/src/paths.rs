use crate::error::{GameError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Directory under `$HOME` used when no explicit root is given.
pub const DATA_DIR: &str = ".owasp-terminal";

pub const STATE_FILE: &str = "state.json";
pub const CONFIG_FILE: &str = "owasp-terminal.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// `$HOME/.owasp-terminal`.
pub fn default_root() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(DATA_DIR))
        .ok_or(GameError::HomeNotFound)
}
