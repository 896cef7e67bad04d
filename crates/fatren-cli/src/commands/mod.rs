//! CLI subcommands.

pub mod extract;
pub mod learn;
pub mod patterns;
pub mod rename;

use std::path::{Path, PathBuf};

/// Resolve the pattern store path: explicit flag, or the per-user
/// config directory.
pub fn store_path(cli_override: Option<&Path>) -> PathBuf {
    match cli_override {
        Some(path) => path.to_path_buf(),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fatren")
            .join("patterns.json"),
    }
}
