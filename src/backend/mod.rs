pub mod http;

pub use http::HttpService;

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Raw content of one file sent to the `upload` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A success status carried a body that could not be used.
    #[error("{message}")]
    Malformed { message: String },

    /// The request never produced a response. Holds the per-operation
    /// fallback message.
    #[error("{0}")]
    Transport(String),

    #[error("API endpoint is not configured.")]
    NotConfigured,
}

/// The remote document question-answering service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentService {
    /// Whether a base address is known. Every other method fails with
    /// [`ServiceError::NotConfigured`] when this returns false.
    fn is_configured(&self) -> bool;

    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, ServiceError>;

    async fn ask(&self, session_id: &str, question: &str) -> Result<AskResponse, ServiceError>;

    async fn delete(&self, session_id: &str) -> Result<(), ServiceError>;
}

pub type ArcService = Arc<dyn DocumentService + Send + Sync>;

impl ServiceError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }
}
