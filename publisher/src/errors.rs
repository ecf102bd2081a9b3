//! Error types for connect-publish

use thiserror::Error;

use crate::models::result::BatchOutcome;

/// Errors raised by the deployment API collaborators
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Server responded {status}: {body}")]
    StatusError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Bundle error: {0}")]
    BundleError(String),

    #[error("Vanity path error: {0}")]
    VanityError(String),
}

/// Errors scoped to a single directory of the batch.
///
/// These never escape the publisher: each is logged and recorded as a failed
/// result for its directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Identity resolution error: {0}")]
    IdentityResolution(String),

    #[error("Submission error: {0}")]
    Submission(#[source] ApiError),

    #[error("Task tracking error: {0}")]
    Tracking(#[source] ApiError),

    #[error("Environment update error: {0}")]
    EnvironmentUpdate(#[source] ApiError),
}

/// Errors that end an action run
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server unreachable: {0}")]
    ServerUnreachable(#[source] ApiError),

    #[error("unsuccessful publish of dirs={}", .failed.join(", "))]
    BatchFailure {
        failed: Vec<String>,
        outcome: BatchOutcome,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<url::ParseError> for ActionError {
    fn from(err: url::ParseError) -> Self {
        ActionError::InvalidUrl(err.to_string())
    }
}
