//! Classifier client error types.

use skinscan_core::SubmitError;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from talking to the classifier service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or its body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered, but not with a usable classification.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// The service answered a health check with a non-success status.
    #[error("service returned HTTP {0}")]
    Status(u16),
}

impl ClientError {
    /// Collapse into the submission error the result flow understands.
    #[must_use]
    pub fn into_submit_error(self) -> SubmitError {
        match self {
            Self::Submit(e) => e,
            Self::Network(e) => SubmitError::Transport(e.to_string()),
            Self::Status(status) => SubmitError::Transport(format!("HTTP {status}")),
        }
    }
}
