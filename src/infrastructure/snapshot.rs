// SPDX-License-Identifier: MPL-2.0
//! CBOR snapshot files for the local backend.
//!
//! The in-memory adapters mirror their whole state into one CBOR file after
//! each write. Snapshots are small (a catalog is a few thousand documents),
//! so a full rewrite is simpler than a journal.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a snapshot. A missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or decoded.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let reader = BufReader::new(fs::File::open(path)?);
    Ok(Some(ciborium::from_reader(reader)?))
}

/// Writes a snapshot, creating the parent directory if needed.
///
/// The data goes to a sibling temporary file first and is renamed over the
/// target, so a crash mid-write keeps the previous snapshot.
///
/// # Errors
///
/// Returns an error if the directory, file or encoding fails.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    write_encoded(path, &encode(value)?)
}

/// Encodes a snapshot without touching the disk.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)?;
    Ok(bytes)
}

/// Writes bytes produced by [`encode`] with the same atomic rename as
/// [`save`].
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_encoded(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp = path.with_extension("cbor.tmp");
    {
        let mut writer = BufWriter::new(fs::File::create(&temp)?);
        writer.write_all(bytes)?;
        writer.flush()?;
    }
    fs::rename(&temp, path)?;
    Ok(())
}
