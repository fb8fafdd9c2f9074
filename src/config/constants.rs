use std::time::Duration;

/// Used when neither the config file nor the environment names an endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Overrides `api.endpoint`. An empty value leaves the endpoint unset.
pub const API_ENDPOINT_ENV: &str = "PDFCHAT_API_URL";

pub const LOG_FILE_PATH: &str = "/tmp/pdfchat.log";

pub const PDF_EXTENSION: &str = "pdf";

pub const NO_RESPONSE: &str = "No response.";

pub const UPLOAD_FAILED: &str = "Upload failed.";

pub const ASK_FAILED: &str = "Failed to get an answer.";

pub const DELETE_FAILED: &str = "Failed to delete session.";

pub const FRAME_DURATION: Duration = Duration::from_millis(1000 / 8); // 8 FPS

pub const BUBBLE_WIDTH_PERCENT: usize = 70; // 70% of the transcript width
