//! Error types for chainkg-rs.

use std::path::PathBuf;

/// Alias for Results returning [`ChainGraphError`].
pub type Result<T> = std::result::Result<T, ChainGraphError>;

/// Top-level error type for chainkg-rs.
///
/// Only [`ChainGraphError::Parse`] and [`ChainGraphError::Io`] abort an
/// ingestion run. Driver failures are absorbed per record by the write engine.
#[derive(Debug, thiserror::Error)]
pub enum ChainGraphError {
    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Parse error in {} at line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChainGraphError {
    /// Create an IO error with a path context.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChainGraphError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts an ingestion run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChainGraphError::Parse { .. } | ChainGraphError::Io { .. })
    }
}

impl From<neo4rs::Error> for ChainGraphError {
    fn from(err: neo4rs::Error) -> Self {
        ChainGraphError::Driver(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_names_file_and_line() {
        let err = ChainGraphError::Parse {
            path: PathBuf::from("data/company.json"),
            line: 7,
            reason: "expected value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/company.json"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn test_only_load_errors_are_fatal() {
        let parse = ChainGraphError::Parse {
            path: PathBuf::from("x.json"),
            line: 1,
            reason: String::new(),
        };
        let io = ChainGraphError::io(
            "x.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(parse.is_fatal());
        assert!(io.is_fatal());
        assert!(!ChainGraphError::Driver("connection reset".into()).is_fatal());
        assert!(!ChainGraphError::Validation("bad".into()).is_fatal());
    }
}
