//! Error type definitions for the matchday digest
//!
//! The hierarchy mirrors the collaborators around the reconciliation core:
//! configuration and catalog loading, page sources, and publishers.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A required input file (the current channel list) does not exist
    #[error("Configuration missing: {path}")]
    ConfigurationMissing { path: PathBuf },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Page source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Publisher errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Match record (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Page source specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Non-success HTTP status from the listing site
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Connection, timeout or body read failures
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// Page content could not be interpreted
    #[error("Parse error: {message}")]
    Parse { message: String },
}

/// Publisher specific errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// The messaging API answered but refused the message
    #[error("Message rejected: {description}")]
    Rejected { description: String },

    /// The messaging API could not be reached
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl AppError {
    /// Create a configuration-missing error for a path
    pub fn configuration_missing<P: Into<PathBuf>>(path: P) -> Self {
        Self::ConfigurationMissing { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether retrying the failed operation could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Source(SourceError::Transport { .. }) => true,
            Self::Source(SourceError::Http { status, .. }) => *status == 429 || *status >= 500,
            Self::Publish(PublishError::Transport { .. }) => true,
            _ => false,
        }
    }
}

impl SourceError {
    /// Create an HTTP status error
    pub fn http<U: Into<String>>(status: u16, url: U) -> Self {
        Self::Http {
            status,
            url: url.into(),
        }
    }

    /// Create a transport error
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl PublishError {
    /// Create a rejection error
    pub fn rejected<D: Into<String>>(description: D) -> Self {
        Self::Rejected {
            description: description.into(),
        }
    }

    /// Create a transport error
    pub fn transport<M: Into<String>>(message: M) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
