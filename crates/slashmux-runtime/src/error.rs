//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use slashmux_framework::MuxError;

/// Errors that can occur while running a bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Serving or shutting down the router failed.
    #[error(transparent)]
    Mux(#[from] MuxError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
