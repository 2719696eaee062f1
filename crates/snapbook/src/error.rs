//! Error types for snapbook.
//!
//! This module defines all error types used throughout the snapbook crate,
//! covering camera failures, illegal workflow transitions, store addressing
//! mistakes and configuration problems.

use thiserror::Error;

use crate::photo::PhotoId;

/// The main error type for snapbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Camera Errors ===
    /// The user (or platform) refused camera access.
    #[error("camera access denied")]
    PermissionDenied,

    /// No camera is available to open a session on.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The camera failed to produce a picture.
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// A suspending camera call did not complete in time.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    // === Workflow Errors ===
    /// The requested action is not allowed in the current capture state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// The state the workflow was in.
        state: &'static str,
        /// The action that was refused.
        action: &'static str,
    },

    // === Store Errors ===
    /// A positional index did not address an existing photo.
    #[error("photo index {index} out of range (list has {len} photos)")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The list length at the time of the request.
        len: usize,
    },

    /// No photo carries the given identifier.
    #[error("photo {0} not found")]
    PhotoNotFound(PhotoId),

    /// A label edit arrived while no photo was open for editing.
    #[error("no photo is open for editing")]
    EditorClosed,

    // === Script Errors ===
    /// A session script line could not be parsed.
    #[error("script line {line}: {message}")]
    ScriptParse {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for snapbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a capture failure error.
    #[must_use]
    pub fn capture_failed(message: impl Into<String>) -> Self {
        Self::CaptureFailed(message.into())
    }

    /// Create a camera unavailable error.
    #[must_use]
    pub fn camera_unavailable(message: impl Into<String>) -> Self {
        Self::CameraUnavailable(message.into())
    }

    /// Create a timeout error for the named operation.
    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a script parse error.
    #[must_use]
    pub fn script_parse(line: usize, message: impl Into<String>) -> Self {
        Self::ScriptParse {
            line,
            message: message.into(),
        }
    }

    /// Check if this error is a camera permission refusal.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Check if this error is a refused workflow transition.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
