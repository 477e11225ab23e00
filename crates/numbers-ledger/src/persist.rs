//! JSON files on disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};

/// Write `value` as pretty-printed JSON, replacing any existing file.
pub fn write_json<T, P>(path: P, value: &T) -> LedgerResult<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes).map_err(|source| LedgerError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Read a JSON file written by [`write_json`].
pub fn read_json<T, P>(path: P) -> LedgerResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LedgerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}
