//! Error handling for Waymark
//!
//! Two error classes exist in the application and only one of them lives
//! here. Operational failures (network transport, response decoding,
//! superseded loads) are ordinary values a component recovers from locally.
//! Invariant violations (coordinator precondition failures, empty
//! exploration paths) are programming errors and panic instead — they are
//! never represented as a `Result`.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Load error type
///
/// Represents failures of the asynchronous read operations (organizations,
/// hosts, network features, link features, drops, trigger batches).
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The remote request itself failed
    #[error("Request failed: {reason}")]
    Request {
        /// Transport-level description of the failure.
        reason: String,
    },

    /// The response arrived but could not be decoded
    #[error("Failed to decode response: {reason}")]
    Decode {
        /// What part of the payload was malformed.
        reason: String,
    },

    /// The load was superseded by a newer position transition
    #[error("Load superseded by a newer transition")]
    Superseded,
}

/// Session error type
///
/// Failures of the opaque sign-in/sign-out collaborators.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// Sign-in did not complete
    #[error("Sign in failed")]
    SignInFailed,

    /// Sign-out did not complete
    #[error("Sign out failed")]
    SignOutFailed,
}

/// Write error type
///
/// Failures of the outbound write workflow (drop creation/deletion,
/// relationship updates, reports).
#[derive(Error, Debug, Clone)]
pub enum WriteError {
    /// The write request was rejected or never completed
    #[error("Write failed: {reason}")]
    Failed {
        /// Description of the rejection.
        reason: String,
    },
}

/// Main error type for Waymark
///
/// A unified error type that can represent any operational error.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Load error
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Write error
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a load error
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::Load(_))
    }

    /// Check if this load was discarded because a newer transition won
    pub fn is_superseded(&self) -> bool {
        matches!(self, Error::Load(LoadError::Superseded))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
