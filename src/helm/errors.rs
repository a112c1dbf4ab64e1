//! Controller error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dispatch::DispatchError;

/// Result type for controller operations
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Controller errors
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("transition failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("invalid event '{input}': {reason}")]
    InvalidEvent { input: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot read configuration {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ControllerError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ControllerError::InvalidConfig(message.into())
    }

    /// Dispatch failures mean the transition table is broken; everything
    /// else is bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ControllerError::Dispatch(_))
    }
}
