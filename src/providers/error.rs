//! Provider error types

use crate::llm::LlmError;
use thiserror::Error;

/// Failure of a search or synthesis provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn no_inventory(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NoInventory, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn invalid_result(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResult, message)
    }
}

impl From<LlmError> for ProviderError {
    fn from(e: LlmError) -> Self {
        Self::unavailable(format!("generation provider: {}", e.message))
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Provider unreachable or erroring
    Unavailable,
    /// Nothing to offer for the query
    NoInventory,
    /// Call exceeded its deadline
    Timeout,
    /// Result violated the provider contract
    InvalidResult,
}

impl ProviderErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::NoInventory => "no_inventory",
            Self::Timeout => "timeout",
            Self::InvalidResult => "invalid_result",
        }
    }
}
