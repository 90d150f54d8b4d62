//! Application directory helpers anchored to a single `.vintner` folder.
//!
//! Config and log files live under the OS config directory (e.g. `%APPDATA%` on Windows,
//! `~/.config` on Linux). `VINTNER_CONFIG_HOME` replaces that base for tests or portable setups.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory that lives under the config base.
pub const APP_DIR_NAME: &str = ".vintner";
/// Environment variable that replaces the OS config base.
pub const CONFIG_HOME_ENV: &str = "VINTNER_CONFIG_HOME";
const LOGS_DIR_NAME: &str = "logs";

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create the application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Return the root `.vintner` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Return the logs directory inside the `.vintner` root, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join(LOGS_DIR_NAME))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_dir_creates_nested_paths() {
        let base = tempdir().unwrap();
        let target = base.path().join(APP_DIR_NAME).join(LOGS_DIR_NAME);
        let created = ensure_dir(target.clone()).unwrap();
        assert_eq!(created, target);
        assert!(target.is_dir());
        ensure_dir(target.clone()).unwrap();
    }

    #[test]
    fn ensure_dir_reports_blocked_path() {
        let base = tempdir().unwrap();
        let file = base.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_dir(file.join("child")).unwrap_err();
        assert!(matches!(err, AppDirError::CreateDir { .. }));
    }
}
