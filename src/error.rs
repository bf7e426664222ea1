//! Defines the error type shared by the map, its persistence and its rendering.
use crate::graph::TagId;
use thiserror::Error;

/// Every fallible map operation reports one of these.
///
/// `CorruptRecord` carries the offending tag pair so a failed load can name it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Unknown tag {0}")]
    UnknownTag(TagId),
    #[error("Tag {0} already exists")]
    DuplicateTag(TagId),
    #[error("Arc {low}-{high} already exists")]
    DuplicateArc { low: TagId, high: TagId },
    #[error("Corrupt record for arc {low}-{high}: {reason}")]
    CorruptRecord { low: TagId, high: TagId, reason: String },
    #[error("Arc {low}-{high} is not in canonical orientation")]
    Orientation { low: TagId, high: TagId },
    #[error("Arc table is full at {0} arcs")]
    Capacity(usize),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
}

impl MapError {
    pub fn corrupt(low: TagId, high: TagId, reason: impl Into<String>) -> Self {
        MapError::CorruptRecord { low, high, reason: reason.into() }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        MapError::Parse { line, message: message.into() }
    }
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        MapError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        MapError::Json(e.to_string())
    }
}

pub type MapResult<T> = Result<T, MapError>;
