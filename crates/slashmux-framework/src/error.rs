//! Error types for the slashmux framework.

use thiserror::Error;

use slashmux_core::{PatternError, RegistryError};

/// Returned by a filter predicate when an interaction should **not** reach
/// the handler.
///
/// The router recognises this error and drops the interaction without
/// logging anything. All other service errors are treated as failures.
#[derive(Debug, Clone, Error)]
#[error("interaction skipped by filter")]
pub struct EventSkipped;

/// Errors reported by a platform session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The session has not been opened, or was already closed.
    #[error("session is not connected")]
    NotConnected,

    /// Opening or keeping the connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The platform refused a request.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}

impl SessionError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors surfaced by the router.
///
/// Pattern and registry errors happen while routes are declared and should
/// abort startup. Session errors come out of [`Mux::serve`] and
/// [`ServingMux::close`] only.
///
/// [`Mux::serve`]: crate::Mux::serve
/// [`ServingMux::close`]: crate::ServingMux::close
#[derive(Debug, Error)]
pub enum MuxError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to open session")]
    Open(#[source] SessionError),

    #[error("session did not report an application id")]
    MissingApplicationId,

    #[error("failed to publish commands")]
    Publish(#[source] SessionError),

    #[error("failed to close session")]
    Close(#[source] SessionError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for router operations.
pub type MuxResult<T> = Result<T, MuxError>;
