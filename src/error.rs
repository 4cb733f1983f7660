//! Error types for the customer sync pipelines.

use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while loading or syncing customers.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Failed to read local data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited input could not be read
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Input file missing or remote input could not be fetched
    #[error("Input unavailable: {location}: {reason}")]
    InputUnavailable { location: String, reason: String },

    /// An outbound call exceeded the configured timeout
    #[error("Request timed out: {url}")]
    NetworkTimeout { url: String },

    /// Sync endpoint answered with a non-200 status
    #[error("Customer sync post failed, status: {status}, message: {body}")]
    SyncStatus { status: u16, body: String },

    /// Sync endpoint accepted the request but reported record errors
    #[error("Customer sync post response errors: {error_count}")]
    SyncErrors { error_count: i64 },

    /// CRM OAuth token could not be obtained
    #[error("CRM authentication failed: {0}")]
    AuthFailure(String),

    /// CRM answered a lookup with an unexpected status
    #[error("CRM request failed, status: {status}, message: {body}")]
    CrmStatus { status: u16, body: String },

    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or invalid command-line arguments
    #[error("Missing required arguments. Usage: {0}")]
    Usage(&'static str),
}

impl SyncError {
    /// Classifies a reqwest failure, surfacing timeouts separately.
    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::NetworkTimeout {
                url: url.to_string(),
            }
        } else {
            SyncError::Http(err)
        }
    }
}
