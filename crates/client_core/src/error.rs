use reqwest::{Method, StatusCode};
use thiserror::Error;

/// How the interceptor treats a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A response arrived with a 4xx status.
    Expected,
    /// No response, a non-4xx failure status, or an unreadable body.
    Unexpected,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{method} {url} failed with status {status}: {message}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error("{method} {url} failed without a response: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode response of {method} {url}: {source}")]
    Decode {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid collection endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl RemoteError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self.status() {
            Some(status) if status.is_client_error() => ErrorClass::Expected,
            _ => ErrorClass::Unexpected,
        }
    }

    /// The remote answers a delete of a missing post with 400.
    pub fn is_already_deleted(&self) -> bool {
        self.status() == Some(StatusCode::BAD_REQUEST)
    }
}
