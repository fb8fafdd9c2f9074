pub mod controller;
pub mod state;

pub use controller::SessionController;
pub use state::{ControllerState, Transition};

use thiserror::Error;

use crate::backend::ServiceError;

pub const NO_FILES_SELECTED: &str = "Please select at least one PDF file.";
pub const NO_ACTIVE_SESSION: &str = "Please select a document first.";
pub const NO_SESSION_TO_DELETE: &str = "No document selected to delete.";
pub const UNKNOWN_SESSION: &str = "Unknown document.";
pub const ENDPOINT_NOT_CONFIGURED: &str = "API endpoint is not configured.";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to read {name}: {source}")]
    ReadFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A local precondition failed, nothing was sent.
    Validation,
    /// The service answered with a failure.
    Service,
    /// No usable answer came back from the network or the local disk, or
    /// the response body could not be used.
    Transport,
}

impl ControllerError {
    pub fn validation(message: impl Into<String>) -> Self {
        ControllerError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ControllerError::Validation(_) => ErrorKind::Validation,
            ControllerError::Service(ServiceError::NotConfigured) => ErrorKind::Validation,
            ControllerError::Service(
                ServiceError::Transport(_) | ServiceError::Malformed { .. },
            ) => ErrorKind::Transport,
            ControllerError::Service(_) => ErrorKind::Service,
            ControllerError::ReadFile { .. } => ErrorKind::Transport,
        }
    }
}
