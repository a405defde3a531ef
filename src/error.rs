//! Error types for pathgate
//!
//! Every fatal condition surfaces as one [`Error`] carrying a kind and a message.
//! Lower layers (git backends) have their own error types and are folded into
//! [`Error::Resolution`] by the change-set resolver.

use thiserror::Error;

/// Fatal failure of a pathgate invocation
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, empty or unparsable filter declaration, or an invalid input value
    #[error("{0}")]
    Configuration(String),

    /// Every diff strategy failed
    #[error("failed to get changed files: {0}")]
    Resolution(String),

    /// The output channel could not be written
    #[error("failed to write outputs: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }

    /// Stable label for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Resolution(_) => "resolution",
            Self::Output(_) => "output",
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Resolution(_) | Self::Output(_) => 1,
        }
    }
}
