//! Shared error type across lingualink crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed frame or config.
    BadRequest,
    /// Missing or blank credential.
    InvalidToken,
    /// Server refused the authenticated upgrade.
    HandshakeRejected,
    /// Handshake did not finish in time.
    HandshakeTimeout,
    /// Network / socket failure.
    Transport,
    /// Operation not valid in the current connection state.
    InvalidState,
    /// Unsupported config or protocol version.
    UnsupportedVersion,
    /// Internal client error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and UI error mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::HandshakeRejected => "HANDSHAKE_REJECTED",
            ErrorCode::HandshakeTimeout => "HANDSHAKE_TIMEOUT",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("token must not be empty")]
    InvalidToken,
    #[error("handshake rejected: {0}")]
    HandshakeRejected(String),
    #[error("handshake timed out")]
    HandshakeTimeout,
    #[error("transport: {0}")]
    Transport(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl LinkError {
    /// Map internal error to a stable caller-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            LinkError::BadRequest(_) => ErrorCode::BadRequest,
            LinkError::InvalidToken => ErrorCode::InvalidToken,
            LinkError::HandshakeRejected(_) => ErrorCode::HandshakeRejected,
            LinkError::HandshakeTimeout => ErrorCode::HandshakeTimeout,
            LinkError::Transport(_) => ErrorCode::Transport,
            LinkError::InvalidState(_) => ErrorCode::InvalidState,
            LinkError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            LinkError::Internal(_) => ErrorCode::Internal,
        }
    }
}
