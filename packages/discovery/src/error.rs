//! Typed errors for the discovery pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the pipeline can
//! tell a retryable quota signal apart from everything else.

use thiserror::Error;

/// Errors that can occur while discovering candidates.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A required credential is not configured
    #[error("missing configuration: {name}")]
    ConfigMissing { name: &'static str },

    /// Search provider failed (transport, status, or decoding)
    #[error("search unavailable: {0}")]
    SearchUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Extraction provider signalled quota exhaustion
    #[error("extraction provider rate limited: {0}")]
    RateLimited(String),

    /// Every attempt hit the rate limit
    #[error("extraction gave up after {attempts} rate-limited attempts")]
    ExtractionExhausted { attempts: u32 },

    /// Model output was not a JSON array of candidates
    #[error("could not parse extraction response: {source}")]
    ExtractionParse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// Extraction provider failed for a non-quota reason
    #[error("AI service error: {0}")]
    AI(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Caller supplied a value the store cannot key on
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Failure classes reported on a run result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigMissing,
    SearchUnavailable,
    ExtractionRateLimited,
    ExtractionExhausted,
    ExtractionParseError,
    ExtractionFailed,
    Storage,
}

impl DiscoveryError {
    /// Map this error onto its reported failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing { .. } => ErrorKind::ConfigMissing,
            Self::SearchUnavailable(_) => ErrorKind::SearchUnavailable,
            Self::RateLimited(_) => ErrorKind::ExtractionRateLimited,
            Self::ExtractionExhausted { .. } => ErrorKind::ExtractionExhausted,
            Self::ExtractionParse { .. } => ErrorKind::ExtractionParseError,
            Self::AI(_) => ErrorKind::ExtractionFailed,
            Self::Storage(_) | Self::InvalidInput { .. } => ErrorKind::Storage,
        }
    }

    /// Wrap any error as a search failure.
    pub fn search(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::SearchUnavailable(Box::new(e))
    }

    /// Wrap any error as a storage failure.
    pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(e))
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::ConfigMissing => "config_missing",
            ErrorKind::SearchUnavailable => "search_unavailable",
            ErrorKind::ExtractionRateLimited => "extraction_rate_limited",
            ErrorKind::ExtractionExhausted => "extraction_exhausted",
            ErrorKind::ExtractionParseError => "extraction_parse_error",
            ErrorKind::ExtractionFailed => "extraction_failed",
            ErrorKind::Storage => "storage",
        };
        f.write_str(s)
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
