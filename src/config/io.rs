use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::types::{AppConfig, ConfigError};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!("No config at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }
    load_from(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config.normalized())
}

/// Settings for a binary: an explicitly named file must load, otherwise the app directory
/// config is used and falls back to defaults when it is unreadable.
pub fn load_explicit_or_default(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => load_from(path),
        None => Ok(load_or_default().unwrap_or_else(|err| {
            tracing::warn!("{err}; using default settings");
            AppConfig::default()
        })),
    }
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(config)?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            concat!(
                "[training]\nn_trees = 50\nmax_depth = 12\n\n",
                "[artifacts]\nmodel_path = \"out/m.json\"\n",
            ),
        )
        .unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.training.n_trees, 50);
        assert_eq!(config.training.max_depth, Some(12));
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.test_fraction, 0.2);
        assert_eq!(config.artifacts.model_path, PathBuf::from("out/m.json"));
        assert_eq!(config.artifacts.scaler_path, PathBuf::from("scaler.json"));
    }

    #[test]
    fn out_of_range_values_are_normalized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            concat!(
                "[training]\ntest_fraction = 0.9\nn_trees = 0\n",
                "min_samples_split = 0\nmin_samples_leaf = 0\n",
            ),
        )
        .unwrap();
        let training = load_from(&path).unwrap().training;
        assert_eq!(training.test_fraction, 0.5);
        assert_eq!(training.n_trees, 1);
        assert_eq!(training.min_samples_split, 2);
        assert_eq!(training.min_samples_leaf, 1);
    }

    #[test]
    fn explicit_config_must_load() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            load_explicit_or_default(Some(&missing)).unwrap_err(),
            ConfigError::Read { .. }
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[artifacts\n").unwrap();
        assert!(matches!(
            load_explicit_or_default(Some(&broken)).unwrap_err(),
            ConfigError::ParseToml { .. }
        ));

        let valid = dir.path().join("valid.toml");
        std::fs::write(&valid, "[training]\nseed = 9\n").unwrap();
        assert_eq!(load_explicit_or_default(Some(&valid)).unwrap().training.seed, 9);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.training.seed = 7;
        config.training.max_depth = Some(9);
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[training\n").unwrap();
        assert!(matches!(
            load_from(&path).unwrap_err(),
            ConfigError::ParseToml { .. }
        ));
        assert!(matches!(
            load_from(&dir.path().join("absent.toml")).unwrap_err(),
            ConfigError::Read { .. }
        ));
    }
}
