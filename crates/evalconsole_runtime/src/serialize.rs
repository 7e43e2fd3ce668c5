//! History persistence using `MessagePack`.
//!
//! Only entries whose results have settled are saved; restored entries come
//! back already settled.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use evalconsole_foundation::{Error, ErrorKind, Rendered, Result};
use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;
use crate::pending::PendingResult;

/// A saved history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Saved entries, oldest first.
    pub entries: Vec<SavedEntry>,
}

/// One saved history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEntry {
    /// The submitted command.
    pub command: String,
    /// Its settled result.
    pub result: Rendered,
}

impl HistorySnapshot {
    /// Captures the settled entries of a history.
    #[must_use]
    pub fn capture(entries: &[HistoryEntry]) -> Self {
        Self {
            entries: entries
                .iter()
                .filter_map(|entry| {
                    entry.result.peek().map(|result| SavedEntry {
                        command: entry.command.clone(),
                        result: result.clone(),
                    })
                })
                .collect(),
        }
    }

    /// Turns the snapshot back into settled history entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
            .into_iter()
            .map(|saved| HistoryEntry::new(saved.command, PendingResult::ready(saved.result)))
            .collect()
    }
}

/// Serializes a snapshot to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(snapshot: &HistorySnapshot) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(snapshot)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a snapshot from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<HistorySnapshot> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Saves a snapshot to a file, overwriting it if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(snapshot: &HistorySnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |action: &str, e: std::io::Error| {
        Error::new(ErrorKind::Io(format!(
            "failed to {action} file '{}': {e}",
            path.display()
        )))
    };

    let bytes = to_bytes(snapshot)?;
    let file = File::create(path).map_err(|e| io_error("create", e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| io_error("write to", e))?;
    writer.flush().map_err(|e| io_error("flush", e))?;
    Ok(())
}

/// Loads a snapshot from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<HistorySnapshot> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    from_bytes(&bytes)
}
