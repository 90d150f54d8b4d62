//! JSON persistence for the scaler and model artifacts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::ml::forest::RandomForestModel;
use crate::ml::scaler::StandardScaler;

/// Default model artifact filename.
pub const DEFAULT_MODEL_FILE: &str = "model.json";
/// Default scaler artifact filename.
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Which artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => f.write_str("model"),
            ArtifactKind::Scaler => f.write_str("scaler"),
        }
    }
}

/// Errors raised while reading, writing or combining artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact file does not exist.
    #[error("{kind} artifact not found at {path}")]
    Missing { kind: ArtifactKind, path: PathBuf },
    #[error("Failed to read {kind} artifact {path}: {source}")]
    Read {
        kind: ArtifactKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {kind} artifact {path}: {source}")]
    Write {
        kind: ArtifactKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {kind} artifact {path}: {source}")]
    Parse {
        kind: ArtifactKind,
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize {kind} artifact: {source}")]
    Serialize {
        kind: ArtifactKind,
        source: serde_json::Error,
    },
    /// The artifact parsed but violates its structural invariants.
    #[error("Invalid {kind} artifact: {reason}")]
    Invalid { kind: ArtifactKind, reason: String },
    /// Scaler and model were fit on different feature layouts.
    #[error("Artifact feature schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Expected {expected} features but got {actual}")]
    FeatureCount { expected: usize, actual: usize },
}

/// Locations of the model and scaler artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }

    /// Default artifact filenames inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_MODEL_FILE), dir.join(DEFAULT_SCALER_FILE))
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE)
    }
}

/// Write the scaler as pretty JSON.
pub fn save_scaler(path: &Path, scaler: &StandardScaler) -> Result<(), ArtifactError> {
    save_json(ArtifactKind::Scaler, path, scaler)
}

/// Read and validate a scaler artifact.
pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    let scaler: StandardScaler = load_json(ArtifactKind::Scaler, path)?;
    scaler.validate().map_err(|reason| ArtifactError::Invalid {
        kind: ArtifactKind::Scaler,
        reason,
    })?;
    Ok(scaler)
}

/// Write the model as pretty JSON.
pub fn save_model(path: &Path, model: &RandomForestModel) -> Result<(), ArtifactError> {
    save_json(ArtifactKind::Model, path, model)
}

/// Read and validate a model artifact.
pub fn load_model(path: &Path) -> Result<RandomForestModel, ArtifactError> {
    let model: RandomForestModel = load_json(ArtifactKind::Model, path)?;
    model.validate().map_err(|reason| ArtifactError::Invalid {
        kind: ArtifactKind::Model,
        reason,
    })?;
    Ok(model)
}

/// Write both artifacts, replacing the previous pair only once both files are on disk.
///
/// Each artifact goes to a `.tmp` sibling first. A failed write removes the staged files and
/// leaves the existing pair untouched.
pub fn save_pair(
    paths: &ArtifactPaths,
    scaler: &StandardScaler,
    model: &RandomForestModel,
) -> Result<(), ArtifactError> {
    let scaler_bytes = encode(ArtifactKind::Scaler, scaler)?;
    let model_bytes = encode(ArtifactKind::Model, model)?;
    let staged = [
        (ArtifactKind::Scaler, paths.scaler.as_path(), scaler_bytes),
        (ArtifactKind::Model, paths.model.as_path(), model_bytes),
    ];

    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (kind, path, bytes) in &staged {
        let tmp = staging_path(path);
        if let Err(err) = write_file(*kind, &tmp, bytes) {
            for path in &written {
                let _ = std::fs::remove_file(path);
            }
            return Err(err);
        }
        written.push(tmp);
    }
    for ((kind, path, _), tmp) in staged.iter().zip(&written) {
        std::fs::rename(tmp, path).map_err(|source| ArtifactError::Write {
            kind: *kind,
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn save_json<T: Serialize>(
    kind: ArtifactKind,
    path: &Path,
    value: &T,
) -> Result<(), ArtifactError> {
    let bytes = encode(kind, value)?;
    write_file(kind, path, &bytes)
}

fn encode<T: Serialize>(kind: ArtifactKind, value: &T) -> Result<Vec<u8>, ArtifactError> {
    serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Serialize { kind, source })
}

fn write_file(kind: ArtifactKind, path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ArtifactError::Write {
            kind,
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| ArtifactError::Write {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

fn load_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError> {
    if !path.is_file() {
        return Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaler_round_trips_exactly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scaler.json");
        let rows = vec![vec![0.1, 7.3], vec![0.7, 9.95], vec![0.35, 8.0]];
        let names = vec!["a".to_string(), "b".to_string()];
        let scaler = StandardScaler::fit(&rows, &names).unwrap();
        save_scaler(&path, &scaler).unwrap();
        assert_eq!(load_scaler(&path).unwrap(), scaler);
    }

    #[test]
    fn missing_and_corrupt_files_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        assert!(matches!(
            load_model(&path).unwrap_err(),
            ArtifactError::Missing {
                kind: ArtifactKind::Model,
                ..
            }
        ));

        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            load_model(&path).unwrap_err(),
            ArtifactError::Parse { .. }
        ));
    }

    #[test]
    fn invalid_scaler_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(
            &path,
            concat!(
                r#"{"model_version":1,"feature_names":["a"],"mean":[0.0],"#,
                r#""var":[1.0],"scale":[0.0],"n_samples_seen":3}"#,
            ),
        )
        .unwrap();
        assert!(matches!(
            load_scaler(&path).unwrap_err(),
            ArtifactError::Invalid {
                kind: ArtifactKind::Scaler,
                ..
            }
        ));
    }

    fn fitted_pair(names: &[&str]) -> (StandardScaler, RandomForestModel) {
        use crate::ml::forest::{ForestOptions, train_random_forest};
        let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        let x: Vec<Vec<f64>> = (0..10)
            .map(|i| names.iter().enumerate().map(|(j, _)| (i + j) as f64).collect())
            .collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let scaler = StandardScaler::fit(&x, &names).unwrap();
        let options = ForestOptions {
            n_trees: 3,
            ..ForestOptions::default()
        };
        let scaled = scaler.transform(&x).unwrap();
        let model = train_random_forest(&scaled, &y, &names, &options).unwrap();
        (scaler, model)
    }

    #[test]
    fn pair_is_written_and_staging_files_removed() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(&dir.path().join("out"));
        let (scaler, model) = fitted_pair(&["a", "b"]);
        save_pair(&paths, &scaler, &model).unwrap();

        assert_eq!(load_scaler(&paths.scaler).unwrap(), scaler);
        assert_eq!(load_model(&paths.model).unwrap(), model);
        assert!(!staging_path(&paths.scaler).exists());
        assert!(!staging_path(&paths.model).exists());
    }

    #[test]
    fn failed_model_write_keeps_previous_pair() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (old_scaler, old_model) = fitted_pair(&["a", "b"]);
        save_pair(&paths, &old_scaler, &old_model).unwrap();

        // A directory in the staging slot makes the model write fail, even for root.
        std::fs::create_dir(staging_path(&paths.model)).unwrap();
        let (new_scaler, new_model) = fitted_pair(&["c", "d"]);
        let err = save_pair(&paths, &new_scaler, &new_model).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Write {
                kind: ArtifactKind::Model,
                ..
            }
        ));

        assert_eq!(load_scaler(&paths.scaler).unwrap(), old_scaler);
        assert_eq!(load_model(&paths.model).unwrap(), old_model);
        assert!(!staging_path(&paths.scaler).exists());
    }
}
