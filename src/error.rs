//! Typed failures for the fetch and lookup layers.
//!
//! Fetch failures are deliberately fine-grained: the aggregation layer needs
//! to distinguish "the upstream site is slow" (surfaced as 408) from every
//! other flavor of unavailability (absorbed as an empty per-language result).

use thiserror::Error;

/// Failure of a single document fetch. Produced only after both the plain
/// HTTP strategy and the browser fallback have been tried (or the fallback
/// is unavailable).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("browser rendering failed: {0}")]
    Browser(String),

    #[error("navigation timed out after {0}ms")]
    Timeout(u64),

    #[error("both fetch strategies exhausted for {url}")]
    Exhausted { url: String },
}

impl FetchError {
    /// Whether this failure is a timeout (maps to 408 at the REST boundary).
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Timeout(_) => true,
            FetchError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Failure of a product detail lookup after both language fetches were
/// attempted.
#[derive(Debug, Error)]
pub enum DetailError {
    /// Neither language variant produced a usable record.
    #[error("product not found")]
    NotFound,

    /// Both language fetches failed and at least one was a timeout.
    #[error("upstream site is taking too long to respond")]
    UpstreamTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        assert!(FetchError::Timeout(15000).is_timeout());
        assert!(!FetchError::Exhausted {
            url: "https://example.com".to_string()
        }
        .is_timeout());
        assert!(!FetchError::Status {
            status: 503,
            url: "https://example.com".to_string()
        }
        .is_timeout());
    }
}
