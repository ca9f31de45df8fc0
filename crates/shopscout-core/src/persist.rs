//! JSON export of scraped records.

use std::fs;
use std::path::Path;

use crate::record::ProductRecord;
use crate::PersistError;

/// Serializes records as a pretty-printed JSON array, in the order given.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn records_to_json(records: &[ProductRecord]) -> Result<String, PersistError> {
    serde_json::to_string_pretty(records).map_err(PersistError::Json)
}

/// Writes records to `path` as a UTF-8 JSON array, replacing any existing file.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be written and
/// [`PersistError::Json`] if serialization fails.
pub fn write_records_json(path: &Path, records: &[ProductRecord]) -> Result<(), PersistError> {
    let json = records_to_json(records)?;
    fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), count = records.len(), "saved records");
    Ok(())
}

/// Reads records previously written by [`write_records_json`].
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be read and
/// [`PersistError::Json`] if it does not contain a record array.
pub fn read_records_json(path: &Path) -> Result<Vec<ProductRecord>, PersistError> {
    let raw = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(PersistError::Json)
}
