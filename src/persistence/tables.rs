//! CSV table IO

use super::{PersistenceError, PersistenceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `rows` with a header row, replacing any existing file
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;
    for row in rows {
        writer.serialize(row).map_err(csv_error(path))?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

/// Read every row; a missing file is [`PersistenceError::MissingFile`]
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> PersistenceResult<Vec<T>> {
    if !path.exists() {
        return Err(PersistenceError::MissingFile(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path).map_err(csv_error(path))?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_error(path))?;
    debug!(path = %path.display(), rows = rows.len(), "Read CSV");
    Ok(rows)
}

/// Like [`read_csv`] but a missing file reads as no rows
pub fn read_csv_optional<T: DeserializeOwned>(path: &Path) -> PersistenceResult<Vec<T>> {
    match read_csv(path) {
        Err(PersistenceError::MissingFile(_)) => Ok(Vec::new()),
        other => other,
    }
}
