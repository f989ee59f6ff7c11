use std::path::{Path, PathBuf};

use owasp_core::paths;

/// Resolve the data root.
///
/// Priority:
/// 1. `--root` flag / `OWASP_TERMINAL_ROOT` env var (passed in as `explicit`)
/// 2. `$HOME/.owasp-terminal`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match paths::default_root() {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!(error = %e, "using the current directory as data root");
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }
}
