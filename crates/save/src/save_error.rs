// ---------------------------------------------------------------------------
// SaveError: typed errors for map save/load operations
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur while writing or reading a map file.
///
/// A typed enum so callers can match on the failure instead of parsing
/// log strings; nothing at this boundary panics.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// JSON serialization failed.
    Encode(String),
    /// JSON parsing failed (corrupt or hand-edited map file).
    Decode(String),
    /// A cell record references a tile or building the catalog
    /// doesn't know.
    UnknownArchetype(String),
    /// The record list doesn't match the declared width * height.
    ShapeMismatch { expected: usize, found: usize },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::UnknownArchetype(name) => {
                write!(f, "Unknown archetype in map file: {name}")
            }
            SaveError::ShapeMismatch { expected, found } => write!(
                f,
                "Map data has {found} cell records, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}
