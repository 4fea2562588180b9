//! Error types for event and descriptor construction.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtoError`].
pub type Result<T, E = ProtoError> = std::result::Result<T, E>;

/// Errors raised while building protocol values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// A command descriptor was built with an empty invoke keyword.
    #[error("invoke keyword is empty")]
    EmptyKeyword,

    /// The invoke keyword contains whitespace, so no single token can match it.
    #[error("invoke keyword '{0}' contains whitespace")]
    WhitespaceInKeyword(String),
}
