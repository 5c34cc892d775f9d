use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info};
use playlist_core::Record;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Written { path: PathBuf, count: usize },
    /// No records: the destination was left untouched.
    NothingToWrite,
}

/// Writes records as CSV with a header row:
/// `timestamp,artist,title,external_id,cursor_token`.
///
/// An empty slice is a no-op so an earlier export is never clobbered.
pub fn persist_records(records: &[Record], destination: &Path) -> Result<PersistOutcome, PersistError> {
    if records.is_empty() {
        engine_info!("No data to save to {}", destination.display());
        return Ok(PersistOutcome::NothingToWrite);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| PersistError::csv(destination, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PersistError::io(destination, e.into_error()))?;

    write_atomically(destination, &bytes)?;
    engine_debug!(
        "Wrote {} records ({} bytes) to {}",
        records.len(),
        bytes.len(),
        destination.display()
    );
    Ok(PersistOutcome::Written {
        path: destination.to_path_buf(),
        count: records.len(),
    })
}

/// Reads records back from a CSV export, in file order.
pub fn load_records(path: &Path) -> Result<Vec<Record>, PersistError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| PersistError::csv(path, e))?;
    let records = reader
        .deserialize::<Record>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PersistError::csv(path, e))?;
    engine_debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
