//! Depot Ingest Library
//!
//! A Rust library for turning broker portfolio statements, already converted
//! to plain text, into structured holding records grouped by depot.
//!
//! This library provides tools for:
//! - Extracting the depot identifier and statement date from statement headers
//! - Detecting whether a statement uses the markdown table or the legacy line layout
//! - Parsing both layouts with per-row error recovery
//! - Decoding European formatted numbers (`1.234,56`) into exact decimals
//! - Replacing the stored holdings of a depot atomically

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod holding_store;
        pub mod ingestion;
        pub mod statement_parser;
        pub mod text_extractor;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ClientTag, FormatKind, HoldingRecord, IngestSummary, StatementHeader};
pub use app::services::holding_store::{HoldingStore, InMemoryHoldingStore, SqliteHoldingStore};
pub use app::services::ingestion::{Ingestor, ingest};
pub use config::Config;

/// Result type alias for depot ingestion
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for statement ingestion operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Uploaded document cannot be turned into text
    #[error("Unsupported document '{filename}': {reason}")]
    UnsupportedDocument { filename: String, reason: String },

    /// Document bytes are not valid UTF-8
    #[error("Text decoding error in '{filename}'")]
    TextDecoding {
        filename: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Holding store operation failed
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an unsupported document error
    pub fn unsupported_document(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedDocument {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a text decoding error
    pub fn text_decoding(filename: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        Self::TextDecoding {
            filename: filename.into(),
            source,
        }
    }

    /// Create a storage error without an underlying database error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error wrapping a SQLite failure
    pub fn database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage {
            message: "SQLite operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
