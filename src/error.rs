//! Error types.
//!
//! Each concern has its own error enum. Invariant breaks are reported as
//! [`Violation`] and wrapped by the edit and session errors, so callers
//! can always get at the core index, partition ids, and magnitudes.

use thiserror::Error;

use crate::constraints::Violation;

/// Result type for edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Result type for document store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// The persisted document does not have the expected structure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// A required field is absent.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but cannot be read as the expected type.
    #[error("field '{field}' is invalid: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// The document does not deserialize at all.
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl ShapeError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

/// An edit operation was rejected. The input snapshot is untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The edit would break a schedule invariant.
    #[error(transparent)]
    Violation(#[from] Violation),

    /// No partition with this id.
    #[error("unknown partition '{0}'")]
    UnknownPartition(String),

    /// No window with this id in the partition.
    #[error("unknown window '{partition_id}/{window_id}'")]
    UnknownWindow {
        partition_id: String,
        window_id: String,
    },

    /// The module must keep at least one core.
    #[error("cannot remove the last core")]
    LastCore,

    /// A parameter is outside its domain (negative fraction, bad index, ...).
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl EditError {
    pub(crate) fn unknown_window(partition_id: &str, window_id: &str) -> Self {
        Self::UnknownWindow {
            partition_id: partition_id.to_string(),
            window_id: window_id.to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    /// The underlying violation, if this error is one.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }
}

/// Document store failure. Surfaced as-is; never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No document under this id.
    #[error("document '{0}' not found")]
    NotFound(String),

    /// The backend failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Interchange export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the element tree failed.
    #[error("failed to write interchange text: {0}")]
    Write(String),

    /// The writer produced bytes that are not UTF-8.
    #[error(transparent)]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Editor configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error.
    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    /// A setting is outside its domain.
    #[error("invalid setting '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

/// Editing session failure.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The stored document could not be normalized.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An edit was rejected.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Save was refused by the validation gate.
    #[error("save refused: {0}")]
    SaveRefused(Violation),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
