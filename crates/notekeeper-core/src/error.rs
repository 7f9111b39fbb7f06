//! Shared error type across notekeeper crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed body.
    BadRequest,
    /// Requested record does not exist.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and config diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl NotesError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            NotesError::BadRequest(_) => ClientCode::BadRequest,
            NotesError::NotFound => ClientCode::NotFound,
            NotesError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            NotesError::Internal(_) => ClientCode::Internal,
        }
    }
}
