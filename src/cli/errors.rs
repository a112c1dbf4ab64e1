//! CLI-specific error types
//!
//! All CLI errors are fatal: `main` prints them and exits non-zero.

use std::fmt;
use std::io;

use crate::dispatch::DispatchError;
use crate::helm::ControllerError;
use crate::payload::ParsePayloadError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Malformed event or payload text
    InvalidInput,
    /// A handler table failed to build or dispatch
    DispatchFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "HELM_CLI_CONFIG_ERROR",
            Self::IoError => "HELM_CLI_IO_ERROR",
            Self::InvalidInput => "HELM_CLI_INVALID_INPUT",
            Self::DispatchFailed => "HELM_CLI_DISPATCH_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Dispatch failed
    pub fn dispatch_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DispatchFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DispatchError> for CliError {
    fn from(e: DispatchError) -> Self {
        Self::dispatch_failed(e.to_string())
    }
}

impl From<ParsePayloadError> for CliError {
    fn from(e: ParsePayloadError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

impl From<ControllerError> for CliError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::Dispatch(inner) => inner.into(),
            ControllerError::InvalidEvent { .. } => Self::invalid_input(e.to_string()),
            ControllerError::InvalidConfig(_) | ControllerError::ConfigIo { .. } => {
                Self::config_error(e.to_string())
            }
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
