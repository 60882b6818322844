//! Error types for the r53dyn updater
//!
//! This is the error carried across the collaborator traits
//! ([`DnsProvider`](crate::DnsProvider), [`IpSource`](crate::IpSource)).
//! The resolver and reconciler never return it directly: they flatten it
//! into an outcome value.

use thiserror::Error;

/// Result type alias for r53dyn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the r53dyn updater
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// IP discovery failed (service unreachable, bad response, not IPv4)
    #[error("IP source error: {0}")]
    IpSource(String),

    /// IP discovery service refused the request because of its rate limit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// No hosted zone owns the requested name
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (malformed domain name and the like)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-reported error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Human-readable message reported by the provider
        message: String,
    },
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// The provider's own message, without the variant prefix
    ///
    /// Used when flattening a collaborator failure into an outcome value.
    pub fn message(&self) -> &str {
        match self {
            Self::Provider { message, .. } => message,
            Self::IpSource(msg)
            | Self::RateLimited(msg)
            | Self::Config(msg)
            | Self::Http(msg)
            | Self::NotFound(msg)
            | Self::InvalidInput(msg) => msg,
        }
    }
}
