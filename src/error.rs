use std::time::Duration;
use thiserror::Error;

/// Failures reported by a persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by an auth gateway
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no active session")]
    NoSession,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("auth service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the listing core
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing {0} not found")]
    NotFound(String),

    #[error("failed to read listings: {0}")]
    Read(#[source] StoreError),

    #[error("failed to save listing: {0}")]
    Write(#[source] StoreError),

    #[error("invalid listing: {field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    /// The editor had to fetch the listing before saving and nothing was written
    #[error("listing {0} was reloaded before saving")]
    Reloaded(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl ListingError {
    /// The notice shown to an operator when a save does not go through
    pub fn operator_message(&self) -> String {
        match self {
            ListingError::Validation { field, reason } => format!("{} {}", field, reason),
            ListingError::NotFound(_) => "This listing no longer exists.".to_string(),
            ListingError::Reloaded(_) => {
                "The listing was reloaded. Review the form and save again.".to_string()
            }
            ListingError::Read(_) | ListingError::Write(_) | ListingError::Timeout { .. } => {
                "Error saving. Check the connection and that the database schema is up to date."
                    .to_string()
            }
        }
    }
}
