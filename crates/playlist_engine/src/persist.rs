use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PersistError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        PersistError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes `bytes` to `target` through a temp file in the same directory, so a
/// failed write never leaves a truncated file behind.
pub fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_output_dir(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| PersistError::io(&dir, e))?;
    tmp.write_all(bytes).map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.as_file_mut()
        .sync_all()
        .map_err(|e| PersistError::io(target, e))?;

    tmp.persist(target)
        .map_err(|e| PersistError::io(target, e.error))?;
    Ok(())
}
