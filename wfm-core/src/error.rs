//! Error types for fetching and aggregating item statistics

use thiserror::Error;

/// Failure while retrieving an item's trading history from the market
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The market reports that the item does not exist
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Transport failure or an unexpected HTTP status
    #[error("Market unavailable: {0}")]
    Unavailable(String),

    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        FetchError::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        FetchError::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        FetchError::Malformed(msg.into())
    }
}

/// Failure while turning a statistic sequence into a market summary
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Insufficient data: need 2 statistic points, {available} available")]
    InsufficientData { available: usize },

    #[error("No trading volume over the last two days")]
    NoVolume,
}

/// Per-item failure reported in a [`crate::FetchOutcome`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The batch was cancelled before this item finished
    #[error("Cancelled before completion")]
    Cancelled,

    /// The task pricing this item panicked or was aborted
    #[error("Pricing task failed: {0}")]
    TaskFailed(String),
}

impl ItemError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ItemError::Fetch(FetchError::NotFound(_)))
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
