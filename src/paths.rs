//! XDG-compliant path resolution for weft.
//!
//! Follows the XDG Base Directory Specification for the config file and
//! state (log) directories.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(weft::paths::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(weft::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// XDG-compliant directories for weft.
#[derive(Debug, Clone)]
pub struct WeftPaths {
    /// `$XDG_CONFIG_HOME/weft/`
    pub config_dir: PathBuf,
    /// `$XDG_STATE_HOME/weft/`
    pub state_dir: PathBuf,
}

impl WeftPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("weft");

        let state_dir = std::env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/state"))
            .join("weft");

        Ok(Self {
            config_dir,
            state_dir,
        })
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.state_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_use_xdg_layout() {
        // Checks derived paths without mutating env vars (unsafe in edition 2024).
        let paths = WeftPaths::resolve().unwrap();
        assert!(
            paths.config_dir.to_string_lossy().contains("weft"),
            "config_dir should contain 'weft': {}",
            paths.config_dir.display()
        );
        assert!(
            paths.state_dir.to_string_lossy().contains("weft"),
            "state_dir should contain 'weft': {}",
            paths.state_dir.display()
        );
    }

    #[test]
    fn config_file_derives_from_config_dir() {
        let paths = WeftPaths {
            config_dir: PathBuf::from("/cfg/weft"),
            state_dir: PathBuf::from("/state/weft"),
        };
        assert_eq!(paths.config_file(), PathBuf::from("/cfg/weft/config.toml"));
    }
}
