use std::time::Duration;

use thiserror::Error;

/// Tagged union of everything a Riot Client caller can distinguish
/// (spec.md §7). `Degraded` is produced by the ingestion pipeline (E), not
/// by the client itself — D has no notion of "partial".
#[derive(Debug, Error)]
pub enum RiotClientError {
    #[error("summoner or match not found")]
    NotFound,

    #[error("rate limit budget exhausted, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("upstream error: {kind:?}: {message}")]
    Upstream {
        kind: UpstreamKind,
        message: String,
    },

    #[error("riot API key is invalid or revoked")]
    Forbidden,

    #[error("invalid region, queue or ID: {0}")]
    BadRequest(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("response body exceeded the configured size limit")]
    ResponseTooLarge,

    #[error("failed to decode upstream JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    Transient,
    Fatal,
}

impl RiotClientError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            RiotClientError::Upstream {
                kind: UpstreamKind::Transient,
                ..
            }
        )
    }
}
