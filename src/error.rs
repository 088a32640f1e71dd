use thiserror::Error;

use herald_hub::HubError;
use herald_ingestion::IngestError;

/// Externally visible tagged union (spec.md §7): one variant per failure
/// mode a caller needs to distinguish, spanning ingestion, the hub, and
/// process configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("summoner not found")]
    NotFound,

    #[error("rate limit budget exhausted, retry after {retry_after:?}")]
    RateLimited { retry_after: std::time::Duration },

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("riot API key is invalid or revoked")]
    Forbidden,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("subscription hub error: {0}")]
    Hub(#[from] HubError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("too many concurrent requests open for this subscription tier")]
    TooManyConcurrentRequests,

    #[error("{0} is not available on this subscription tier")]
    TierFeatureUnavailable(&'static str),
}

impl From<IngestError> for CoreError {
    fn from(value: IngestError) -> Self {
        match value {
            IngestError::NotFound => CoreError::NotFound,
            IngestError::RateLimited { retry_after } => CoreError::RateLimited { retry_after },
            IngestError::Forbidden => CoreError::Forbidden,
            IngestError::BadRequest(s) => CoreError::BadRequest(s),
            IngestError::Cancelled => CoreError::Cancelled,
            IngestError::Upstream(s) => CoreError::Upstream(s),
        }
    }
}
