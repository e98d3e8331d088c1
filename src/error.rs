//! Error type shared by the loading pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting, transforming or loading data.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Malformed JSON in {path:?} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record in {path:?} at line {line} is missing field `{field}`")]
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },

    #[error("File {0:?} contains no records")]
    EmptyFile(PathBuf),

    #[error("Timestamp {ts} in {path:?} at line {line} is out of range")]
    TimestampOutOfRange { path: PathBuf, line: usize, ts: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl EtlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
