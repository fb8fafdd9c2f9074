use std::time::Duration;

use crate::config::constants::{DEFAULT_API_ENDPOINT, LOG_FILE_PATH};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, true);
    assert_eq!(config.general.bubble_width_percent, 80);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("reqwest"));
    assert_eq!(log_filters[0].level.as_deref(), Some("warn"));

    let log_file = &log.file;
    assert_eq!(log_file.path, "/var/log/pdfchat.log");
    assert_eq!(log_file.append, true);

    assert_eq!(config.api.endpoint(), Some("https://docs.example.com/api"));
    assert_eq!(config.api.timeout(), Some(Duration::from_secs(120)));

    assert_eq!(config.picker.directory.as_deref(), Some("/home/user/papers"));
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    assert_eq!(log.file.path, LOG_FILE_PATH);

    assert_eq!(config.api.endpoint(), Some(DEFAULT_API_ENDPOINT));
    assert_eq!(config.api.timeout(), None);
    assert_eq!(config.picker.directory, None);
}

#[test]
fn test_empty_endpoint_is_unset() {
    let config =
        load_configuration("./testdata/config_empty_endpoint.toml").expect("failed to load config");
    assert_eq!(config.api.endpoint(), None);
}

#[test]
fn test_apply_endpoint_override() {
    let config = apply_endpoint_override(Configuration::default(), None);
    assert_eq!(config.api.endpoint(), Some(DEFAULT_API_ENDPOINT));

    let config = apply_endpoint_override(
        Configuration::default(),
        Some("http://10.0.0.5:9000/".to_string()),
    );
    assert_eq!(config.api.endpoint(), Some("http://10.0.0.5:9000"));

    let config = apply_endpoint_override(Configuration::default(), Some("  ".to_string()));
    assert_eq!(config.api.endpoint(), None);
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$PDFCHAT_TEST_PATH/${PDFCHAT_USER_PATH}/config.toml")
        .expect("failed to resolve path");
    assert_eq!(ret, "//config.toml");

    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("PDFCHAT_TEST_PATH", dir);
        std::env::set_var("PDFCHAT_USER_PATH", user_path);
    }
    let ret = resolve_path("$PDFCHAT_TEST_PATH/${PDFCHAT_USER_PATH}/config.toml")
        .expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/config.toml"));
}

#[test]
fn test_basename() {
    assert_eq!(basename("src/config/utils.rs"), "utils.rs");
    assert_eq!(basename("main.rs"), "main.rs");
}
