//! Catalog error types

use thiserror::Error;

/// Failure talking to the catalog service
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CatalogError {
    pub kind: CatalogErrorKind,
    pub message: String,
}

impl CatalogError {
    pub fn new(kind: CatalogErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(CatalogErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(CatalogErrorKind::Timeout, message)
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::new(CatalogErrorKind::Status, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(CatalogErrorKind::Api, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(CatalogErrorKind::Parse, message)
    }
}

/// Error classification for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    /// Connection failures
    Network,
    /// The request exceeded its timeout
    Timeout,
    /// Non-success HTTP status
    Status,
    /// The service answered with an `<error>` document
    Api,
    /// The body could not be decoded
    Parse,
}

impl CatalogErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Status => "status",
            Self::Api => "api",
            Self::Parse => "parse",
        }
    }
}
