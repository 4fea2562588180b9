//! Unified error handling for herald.
//!
//! No error in the runtime is fatal: registries report and drop bad
//! registrations, and the handler loop logs whatever `handle` returns and
//! moves on to the next event.

use thiserror::Error;

// ============================================================================
// Registry Errors (command tables)
// ============================================================================

/// Errors raised by a command table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The keyword is already owned by an earlier registration.
    #[error("command with invoke keyword '{0}' already registered")]
    DuplicateKeyword(String),
}

// ============================================================================
// Handler Errors (event processing)
// ============================================================================

/// Errors that can occur while a handler processes an event.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid command descriptor: {0}")]
    Descriptor(#[from] herald_proto::ProtoError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Descriptor(_) => "invalid_descriptor",
            Self::Output(_) => "output_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;
