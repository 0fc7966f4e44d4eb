//! Grammar snapshots using `MessagePack`.
//!
//! A snapshot is a whole [`GrammarGraph`], ids and declaration order
//! included, so a graph loaded from one compiles to the same registry.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use cxg_foundation::{Error, ErrorKind, GrammarGraph, Result};
use tracing::debug;

/// Serializes a graph to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(graph: &GrammarGraph) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(graph)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a graph from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<GrammarGraph> {
    rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Saves a graph to a file, overwriting any existing one.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(graph: &GrammarGraph, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |what: &str, e: std::io::Error| {
        Error::new(ErrorKind::IoError(format!(
            "failed to {what} file '{}': {e}",
            path.display()
        )))
    };

    let bytes = to_bytes(graph)?;
    let file = File::create(path).map_err(|e| io_error("create", e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| io_error("write", e))?;
    writer.flush().map_err(|e| io_error("flush", e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "saved snapshot");
    Ok(())
}

/// Loads a graph from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<GrammarGraph> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    from_bytes(&bytes)
}
