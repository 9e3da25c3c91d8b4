use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot open '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot prepare directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("archive is unreadable: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("extraction cancelled")]
    Cancelled,
}

impl ExtractError {
    /// Whether offering the user a retry of the same source makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractError::Open { .. } | ExtractError::Write { .. } | ExtractError::Cancelled
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failure_is_retryable() {
        let err = ExtractError::Open {
            path: PathBuf::from("/missing.cbr"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "cannot open '/missing.cbr': gone");
    }

    #[test]
    fn malformed_archive_is_not_retryable() {
        let err = ExtractError::Archive(zip::result::ZipError::FileNotFound);
        assert!(!err.is_retryable());
        assert!(!ExtractError::CreateDir {
            path: PathBuf::from("cache"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .is_retryable());
        assert!(ExtractError::Cancelled.is_retryable());
    }
}
