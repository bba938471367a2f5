//! Error types for the FreightDesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant, and every public entry
//! point re-raises exactly one of these — no lower-level library error type
//! leaks through to callers.

use thiserror::Error;

/// The top-level error type for all FreightDesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Table validation ---
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    // --- Summarization ---
    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),

    // --- Remote completion relay ---
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    // --- Table loading ---
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    // --- Transcript persistence ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Raised by table validation, never by the summarizer itself.
#[derive(Debug, Clone, Error)]
pub enum TableError {
    #[error("Table has no rows")]
    NoRows,

    #[error("Table has no columns")]
    NoColumns,
}

/// Any failure while computing a table digest.
#[derive(Debug, Clone, Error)]
pub enum SummaryError {
    #[error("Data summarization error: {0}")]
    Computation(String),
}

/// Remote completion call failed — network, auth, quota, or a malformed
/// response. Callers never see the HTTP client's native error types.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size_mb:.1} MB (max {max_mb} MB)")]
    TooLarge { size_mb: f64, max_mb: u64 },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to save chat history: {0}")]
    SaveFailed(String),

    #[error("Failed to load chat history: {0}")]
    LoadFailed(String),

    #[error("Conversation not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_error_displays_correctly() {
        let err = Error::Table(TableError::NoRows);
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn relay_error_displays_correctly() {
        let err = Error::Relay(RelayError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn config_error_displays_correctly() {
        let err = Error::Config {
            message: "GROQ_API_KEY not found in environment".into(),
        };
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
