//! Error types for rapid_wordcluster
//!
//! This module defines the error types used throughout the library.
//! Configuration and data errors are fatal and carry the offending name;
//! numeric edge cases inside the distance metrics never reach this type.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, WordClusterError>;

/// Main error type for rapid_wordcluster
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WordClusterError {
    /// Configuration validation failed (unknown metric, cutoff out of range, ...)
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A word requested for clustering was never observed in the tagged corpus
    #[error("Unknown word: '{word}' has no word type")]
    UnknownWord { word: String },

    /// Malformed data handed across a module boundary
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A distance-matrix worker failed; the whole matrix is discarded
    #[error("Worker for block {block} failed: {message}")]
    WorkerFailed { block: usize, message: String },

    /// Malformed line in a tagged corpus
    #[error("Corpus error on line {line}: {message}")]
    Corpus { line: usize, message: String },

    /// Filesystem failure while reading a corpus or writing a dendrogram
    #[error("I/O error: {message}")]
    Io { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl WordClusterError {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown word error
    pub fn unknown_word(word: impl Into<String>) -> Self {
        Self::UnknownWord { word: word.into() }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a worker failure error
    pub fn worker_failed(block: usize, message: impl Into<String>) -> Self {
        Self::WorkerFailed {
            block,
            message: message.into(),
        }
    }

    /// Create a corpus format error
    pub fn corpus(line: usize, message: impl Into<String>) -> Self {
        Self::Corpus {
            line,
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error was raised by configuration validation
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

impl From<serde_json::Error> for WordClusterError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for WordClusterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WordClusterError::invalid_config("unknown metric 'foo'");
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("foo"));

        let err = WordClusterError::unknown_word("zebra");
        assert!(err.to_string().contains("'zebra'"));

        let err = WordClusterError::corpus(12, "missing tag");
        assert!(err.to_string().contains("line 12"));
    }

    #[test]
    fn test_is_config_error() {
        assert!(WordClusterError::invalid_config("x").is_config_error());
        assert!(!WordClusterError::unknown_word("x").is_config_error());
        assert!(!WordClusterError::worker_failed(3, "boom").is_config_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: WordClusterError = io.into();
        assert!(matches!(err, WordClusterError::Io { .. }));
    }
}
