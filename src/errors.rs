//! Tracking Engine Error Hierarchy
//!
//! Failures are grouped by the collaborator that produced them. None of them
//! is fatal to a fan-out pass: the tracker logs, counts and moves on.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Search-source call failed for one tracked query
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Rich body could not be rendered as well-formed markup
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Surfaced by the delivery collaborator, never retried here
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Persistence collaborator failures
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Search endpoint down or returned a server error
    #[error("Search source unavailable: {0}")]
    SourceUnavailable(String),

    /// Request budget exhausted on the search side
    #[error("Search source rate limited (retry after: {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Search request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Delivery to {address} rejected: {reason}")]
    Rejected { address: String, reason: String },

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Tracked query {0} not found")]
    QueryNotFound(u64),

    #[error("Subscriber {0} not found")]
    SubscriberNotFound(String),

    /// Backend specific failure with context
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Short label used for metrics and structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Fetch(FetchError::RateLimited { .. }) => "rate_limited",
            Error::Fetch(FetchError::Timeout(_)) => "timeout",
            Error::Fetch(FetchError::SourceUnavailable(_)) => "unavailable",
            Error::Render(_) => "render",
            Error::Delivery(_) => "delivery",
            Error::Storage(_) => "storage",
        }
    }
}
