//! Error handling for equipment dataset operations.
//!
//! Parsing and summarising never fail; these errors cover the collaborators
//! around them: file access, uploads, authentication, history lookups and the
//! remote dataset service.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChemvizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid upload {file}: {reason}")]
    InvalidUpload { file: String, reason: String },

    #[error("No valid data found in CSV: {file}")]
    EmptyDataset { file: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not authenticated - run `chemviz login` first")]
    NotAuthenticated,

    #[error("{message}")]
    Remote { message: String },

    #[error("History entry not found: {id}")]
    HistoryEntryNotFound { id: u64 },

    #[error("No dataset loaded - upload a CSV file first")]
    NoDataset,

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl ChemvizError {
    /// Create an invalid upload error
    pub fn invalid_upload(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUpload {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an error carrying a message reported by the remote service
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChemvizError>;
