use thiserror::Error;

/// Application-wide error types for Taxon.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Title or main-content extraction found nothing usable.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Zero-shot classifier API call failed.
    #[error("Classifier error (HTTP {status_code}): {message}")]
    ClassifierError { message: String, status_code: u16 },

    /// Classifier rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Request violates an input invariant. Raised before any work begins.
    #[error("Invalid request: {0}")]
    ValidationError(String),
}
