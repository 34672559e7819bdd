//! Model artifact storage
//!
//! A trained model is stored as a single `bincode` file. Writes go to a
//! temporary file in the destination directory which is then renamed over the
//! artifact, so a concurrent reader sees either the old file or the new one,
//! never a partial write.

use super::TrainedModel;
use crate::error::{LoadError, PersistError};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Persist `model` at `path`, replacing any existing artifact atomically.
///
/// # Errors
/// Returns [`PersistError`] if encoding fails or the file cannot be written
/// or renamed into place. The previous artifact, if any, is left untouched.
pub fn save(model: &TrainedModel, path: &Path) -> Result<(), PersistError> {
    let bytes = bincode::serialize(model)?;
    let io_err = |source: io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    info!("Saved {} model ({} bytes) to {}", model.kind_name(), bytes.len(), path.display());
    Ok(())
}

/// Load the model artifact at `path`.
///
/// # Errors
/// - [`LoadError::Missing`] if no file exists
/// - [`LoadError::Io`] if the file cannot be read
/// - [`LoadError::Corrupt`] if the bytes do not decode to a well-formed model
pub fn load(path: &Path) -> Result<TrainedModel, LoadError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let model: TrainedModel = bincode::deserialize(&bytes).map_err(|e| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !model.is_well_formed() {
        return Err(LoadError::Corrupt {
            path: path.to_path_buf(),
            reason: "model structure failed validation".to_string(),
        });
    }

    info!("Loaded {} model from {}", model.kind_name(), path.display());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForestParams, LinearRegressor, RandomForest, Regressor};

    fn tiny_forest() -> TrainedModel {
        let rows: Vec<_> = (0..30)
            .map(|i| [f64::from(i), 0.0, 0.0, 0.0, 0.0])
            .collect();
        let targets: Vec<f64> = (0..30).map(|i| f64::from(i) / 30.0).collect();
        let params = ForestParams {
            n_trees: 4,
            ..ForestParams::default()
        };
        TrainedModel::Forest(RandomForest::fit(&rows, &targets, &params, 1).unwrap())
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let model = tiny_forest();

        save(&model, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, model);
        let row = [12.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(loaded.predict_row(&row), model.predict_row(&row));
    }

    #[test]
    fn test_save_overwrites_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.bin");

        save(&tiny_forest(), &path).unwrap();

        let rows: Vec<_> = (0..12)
            .map(|i| {
                let x = f64::from(i);
                [x, x.sin(), x.cos(), (x * 0.5).sin(), (x * 1.7).cos()]
            })
            .collect();
        let targets: Vec<f64> = rows.iter().map(|r| 0.1 * r[0]).collect();
        let linear = TrainedModel::Linear(LinearRegressor::fit(&rows, &targets).unwrap());
        save(&linear, &path).unwrap();

        assert_eq!(load(&path).unwrap(), linear);
        // Only the artifact remains, no leftover temporaries
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, LoadError::Missing { .. }));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, b"definitely not a model").unwrap();
        assert!(matches!(load(&path).unwrap_err(), LoadError::Corrupt { .. }));
    }

    #[test]
    fn test_truncated_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        save(&tiny_forest(), &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(load(&path).unwrap_err(), LoadError::Corrupt { .. }));
    }
}
