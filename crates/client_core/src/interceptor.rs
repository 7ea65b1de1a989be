//! Process-wide observation of failed remote calls.
//!
//! Every request the HTTP remote issues hands its failure to an
//! [`ErrorInterceptor`] before the error reaches the caller. The interceptor
//! classifies, logs and alerts, then returns the same error so local handlers
//! still run.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{ErrorClass, RemoteError};

pub const UNEXPECTED_ERROR_MESSAGE: &str = "unexpected error happened";
pub const ALREADY_DELETED_MESSAGE: &str = "This post has already been deleted!!";

/// A user-facing, blocking message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    UnexpectedError,
    AlreadyDeleted,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::UnexpectedError => UNEXPECTED_ERROR_MESSAGE,
            Notice::AlreadyDeleted => ALREADY_DELETED_MESSAGE,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Clone)]
pub struct ErrorInterceptor {
    notifier: Arc<dyn Notifier>,
}

impl ErrorInterceptor {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Never swallows: the error comes back unchanged.
    pub fn observe(&self, err: RemoteError) -> RemoteError {
        match err.class() {
            ErrorClass::Expected => {
                debug!(status = ?err.status(), error = %err, "expected remote error");
            }
            ErrorClass::Unexpected => {
                error!(error = %err, "Logging the error");
                self.notifier.notify(Notice::UnexpectedError);
            }
        }
        err
    }
}
