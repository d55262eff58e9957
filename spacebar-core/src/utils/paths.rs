//! Application-specific path resolution.
//!
//! Paths follow the XDG Base Directory Specification via `directories-next`:
//! - [`app_config_dir()`]: e.g. `~/.config/spacebar`.
//! - [`app_state_dir()`]: `$XDG_STATE_HOME/spacebar`, e.g. `~/.local/state/spacebar`
//!   (the local data directory on platforms other than Linux).

use std::path::PathBuf;
#[cfg(target_os = "linux")]
use directories_next::BaseDirs;
use directories_next::ProjectDirs;
use crate::error::{ConfigError, CoreError};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "NovaDE";
const APPLICATION: &str = "spacebar";

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "Project".to_string(),
        })
    })
}

/// Returns the directory holding `config.toml`.
pub fn app_config_dir() -> Result<PathBuf, CoreError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Returns the directory for runtime state such as log files.
///
/// On Linux this is `$XDG_STATE_HOME/spacebar`, defaulting to
/// `~/.local/state/spacebar`. `ProjectDirs` has no state directory, so other
/// platforms use the local data directory.
pub fn app_state_dir() -> Result<PathBuf, CoreError> {
    #[cfg(target_os = "linux")]
    {
        let base = match std::env::var("XDG_STATE_HOME") {
            Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
            _ => BaseDirs::new()
                .map(|dirs| dirs.home_dir().join(".local/state"))
                .ok_or_else(|| {
                    CoreError::Config(ConfigError::DirectoryUnavailable {
                        dir_type: "State".to_string(),
                    })
                })?,
        };
        Ok(base.join(APPLICATION))
    }
    #[cfg(not(target_os = "linux"))]
    {
        Ok(project_dirs()?.data_local_dir().to_path_buf())
    }
}

/// Creates `path` and all of its parents if they are missing.
pub fn ensure_dir_exists(path: &std::path::Path) -> Result<(), CoreError> {
    std::fs::create_dir_all(path).map_err(|source| CoreError::Filesystem {
        message: "Failed to create directory".to_string(),
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_exists_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directories are fine.
        ensure_dir_exists(&nested).unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_app_state_dir_follows_xdg_state_home() {
        let tmp = tempfile::tempdir().unwrap();
        let previous = std::env::var_os("XDG_STATE_HOME");
        std::env::set_var("XDG_STATE_HOME", tmp.path());
        let dir = app_state_dir();
        match previous {
            Some(value) => std::env::set_var("XDG_STATE_HOME", value),
            None => std::env::remove_var("XDG_STATE_HOME"),
        }
        assert_eq!(dir.unwrap(), tmp.path().join("spacebar"));
    }
}
