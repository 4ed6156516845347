use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read report {}: {source}", path.display())]
    ReadReport {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid coverage tag {0} (expected 0, 1 or 2)")]
    InvalidCoverage(u8),

    #[error("invalid diff state {0} (expected 0 through 4)")]
    InvalidDiffState(u8),
}

pub type Result<T> = std::result::Result<T, CovscopeError>;
