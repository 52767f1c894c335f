use shelfwise_core::error::{ErrorCode, ShelfwiseError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),
    #[error("At least one genre is required")]
    NoGenres,
}

impl ShelfwiseError for IngestionError {
    fn error_code(&self) -> ErrorCode {
        match self {
            IngestionError::Io { source, .. } | IngestionError::Read(source)
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ErrorCode::NotFound
            }
            IngestionError::Io { .. } | IngestionError::Read(_) => ErrorCode::Internal,
            IngestionError::MalformedRecord { .. }
            | IngestionError::InvalidJson { .. }
            | IngestionError::UnknownGenre(_)
            | IngestionError::NoGenres => ErrorCode::InvalidArgument,
        }
    }
}
