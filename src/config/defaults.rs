use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn api_endpoint() -> Option<String> {
    Some(DEFAULT_API_ENDPOINT.to_string())
}

pub(crate) fn bubble_width_percent() -> usize {
    BUBBLE_WIDTH_PERCENT
}
