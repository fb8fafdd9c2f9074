#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use reqwest::{StatusCode, multipart};
use serde_json::Value;

use crate::backend::{AskResponse, DocumentService, ServiceError, UploadFile, UploadResponse};
use crate::config::constants::{ASK_FAILED, DELETE_FAILED, UPLOAD_FAILED};
use crate::config::{ApiConfig, user_agent};

const PDF_MIME: &str = "application/pdf";

/// reqwest client for the document service.
#[derive(Default)]
pub struct HttpService {
    client: reqwest::Client,
    endpoint: Option<String>,
    timeout: Option<time::Duration>,
}

#[async_trait]
impl DocumentService for HttpService {
    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, ServiceError> {
        let url = self.url("upload")?;
        let part = multipart::Part::bytes(file.content)
            .file_name(file.name.clone())
            .mime_str(PDF_MIME)
            .map_err(|err| {
                log::error!("Invalid upload part for {}: {}", file.name, err);
                ServiceError::Transport(UPLOAD_FAILED.to_string())
            })?;
        let form = multipart::Form::new().part("file", part);

        log::debug!("Uploading {} to {}", file.name, url);
        let req = self.client.post(url).multipart(form);
        let (status, body) = self.send(req, UPLOAD_FAILED).await?;
        check_status(status, &body, UPLOAD_FAILED)?;

        let resp = serde_json::from_value::<UploadResponse>(body).map_err(|err| {
            log::warn!("Upload response of {} is malformed: {}", file.name, err);
            ServiceError::Malformed {
                message: UPLOAD_FAILED.to_string(),
            }
        })?;

        if resp.session_id.is_empty() {
            log::warn!("Upload response of {} has an empty session id", file.name);
            return Err(ServiceError::Malformed {
                message: UPLOAD_FAILED.to_string(),
            });
        }
        Ok(resp)
    }

    async fn ask(&self, session_id: &str, question: &str) -> Result<AskResponse, ServiceError> {
        let url = self.url("ask")?;
        let req = self
            .client
            .get(url)
            .query(&[("session_id", session_id), ("question", question)]);

        let (status, body) = self.send(req, ASK_FAILED).await?;
        check_status(status, &body, ASK_FAILED)?;

        Ok(serde_json::from_value::<AskResponse>(body).unwrap_or_else(|err| {
            log::warn!("Ask response is malformed: {}", err);
            AskResponse::default()
        }))
    }

    async fn delete(&self, session_id: &str) -> Result<(), ServiceError> {
        let url = self.url("delete")?;
        let req = self.client.delete(url).query(&[("session_id", session_id)]);

        let (status, body) = self.send(req, DELETE_FAILED).await?;
        check_status(status, &body, DELETE_FAILED)
    }
}

impl From<&ApiConfig> for HttpService {
    fn from(value: &ApiConfig) -> Self {
        let mut service = HttpService::default();
        if let Some(endpoint) = value.endpoint() {
            service = service.with_endpoint(endpoint);
        }
        if let Some(timeout) = value.timeout() {
            service = service.with_timeout(timeout);
        }
        service
    }
}

impl HttpService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base address. An empty value leaves the service unconfigured.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        let endpoint = endpoint.trim().trim_end_matches('/');
        self.endpoint = if endpoint.is_empty() {
            None
        } else {
            Some(endpoint.to_string())
        };
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    fn url(&self, path: &str) -> Result<String, ServiceError> {
        match self.endpoint.as_deref() {
            Some(endpoint) => Ok(format!("{}/{}", endpoint, path)),
            None => Err(ServiceError::NotConfigured),
        }
    }

    /// Sends `req` and parses the body. A request that produces no response
    /// fails with `fallback`; the transport error itself is only logged.
    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<(StatusCode, Value), ServiceError> {
        let mut req = req.header("User-Agent", user_agent());
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await.map_err(|err| {
            log::error!("Request failed: {}", err);
            ServiceError::Transport(fallback.to_string())
        })?;

        let status = res.status();
        let text = match res.text().await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Failed to read response body: {}", err);
                String::new()
            }
        };
        log::trace!("Response {}: {}", status, text);
        Ok((status, parse_body(&text)))
    }
}

/// Parses a response body, degrading anything that is not a JSON object to
/// an empty object.
pub(crate) fn parse_body(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => value,
        _ => {
            if !text.is_empty() {
                log::warn!("Response body is not a JSON object: {}", text);
            }
            Value::Object(Default::default())
        }
    }
}

fn check_status(status: StatusCode, body: &Value, fallback: &str) -> Result<(), ServiceError> {
    if status.is_success() {
        return Ok(());
    }

    let message = body
        .get("detail")
        .and_then(Value::as_str)
        .filter(|detail| !detail.is_empty())
        .unwrap_or(fallback)
        .to_string();
    log::error!("Service responded {}: {}", status, message);
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}
