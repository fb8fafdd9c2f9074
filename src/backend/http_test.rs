use mockito::Matcher;

use crate::controller::{ControllerError, ErrorKind};

use super::*;

fn pdf(name: &str) -> UploadFile {
    UploadFile {
        name: name.to_string(),
        content: b"%PDF-1.4 test".to_vec(),
    }
}

#[tokio::test]
async fn test_upload() {
    let mut server = mockito::Server::new_async().await;
    let upload_handler = server
        .mock("POST", "/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::Regex(
            r#"name="file"; filename="a.pdf""#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"message":"PDF uploaded successfully!","session_id":"s1","filename":"a.pdf"}"#)
        .expect(1)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let res = service.upload(pdf("a.pdf")).await.expect("Failed to upload");

    assert_eq!(res.session_id, "s1");
    assert_eq!(res.filename.as_deref(), Some("a.pdf"));
    upload_handler.assert_async().await;
}

#[tokio::test]
async fn test_upload_error_detail() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/upload")
        .with_status(500)
        .with_body(r#"{"detail":"No readable text found in PDF."}"#)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let err = service.upload(pdf("scan.pdf")).await.unwrap_err();

    match err {
        ServiceError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "No readable text found in PDF.");
        }
        err => panic!("Unexpected error: {:?}", err),
    }
}

#[tokio::test]
async fn test_upload_error_without_json_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/upload")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let err = service.upload(pdf("a.pdf")).await.unwrap_err();
    assert_eq!(err.to_string(), UPLOAD_FAILED);
}

#[tokio::test]
async fn test_upload_malformed_success() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/upload")
        .with_status(200)
        .with_body(r#"{"filename":"a.pdf"}"#)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let err = service.upload(pdf("a.pdf")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed { .. }));
    assert_eq!(err.to_string(), UPLOAD_FAILED);
}

#[tokio::test]
async fn test_ask() {
    let mut server = mockito::Server::new_async().await;
    let ask_handler = server
        .mock("GET", "/ask")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("session_id".to_string(), "s1".to_string()),
            Matcher::UrlEncoded("question".to_string(), "What is this?".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"answer":"It is a report."}"#)
        .expect(1)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let res = service
        .ask("s1", "What is this?")
        .await
        .expect("Failed to ask");

    assert_eq!(res.answer.as_deref(), Some("It is a report."));
    ask_handler.assert_async().await;
}

#[tokio::test]
async fn test_ask_without_answer() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/ask")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let res = service.ask("s1", "Hello?").await.expect("Failed to ask");
    assert_eq!(res.answer, None);
}

#[tokio::test]
async fn test_ask_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/ask")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"detail":"Session not found."}"#)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let err = service.ask("gone", "Hello?").await.unwrap_err();
    assert_eq!(err.to_string(), "Session not found.");
}

#[tokio::test]
async fn test_delete() {
    let mut server = mockito::Server::new_async().await;
    let delete_handler = server
        .mock("DELETE", "/delete")
        .match_query(Matcher::UrlEncoded(
            "session_id".to_string(),
            "s1".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"message":"Session deleted successfully"}"#)
        .expect(1)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&format!("{}/", server.url()));
    service.delete("s1").await.expect("Failed to delete");
    delete_handler.assert_async().await;
}

#[tokio::test]
async fn test_delete_error_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/delete")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"detail":""}"#)
        .create_async()
        .await;

    let service = HttpService::new().with_endpoint(&server.url());
    let err = service.delete("s1").await.unwrap_err();
    assert_eq!(err.to_string(), DELETE_FAILED);
}

/// Returns an address nothing listens on.
fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_unreachable_service_uses_fallback_messages() {
    let service = HttpService::new().with_endpoint(&unreachable_endpoint());

    let err = service.upload(pdf("a.pdf")).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.to_string(), UPLOAD_FAILED);

    let err = service.ask("s1", "What is secret?").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.to_string(), ASK_FAILED);
    assert!(!err.to_string().contains("secret"));

    let err = service.delete("s1").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.to_string(), DELETE_FAILED);

    let err = ControllerError::from(err);
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.to_string(), DELETE_FAILED);
}

#[tokio::test]
async fn test_not_configured() {
    let service = HttpService::new().with_endpoint("  ");
    assert!(!service.is_configured());

    let err = service.ask("s1", "Hello?").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotConfigured));
}

#[test]
fn test_from_api_config() {
    let config = ApiConfig {
        endpoint: Some("http://127.0.0.1:8000/".to_string()),
        timeout_secs: Some(30),
    };
    let service = HttpService::from(&config);
    assert_eq!(service.endpoint(), Some("http://127.0.0.1:8000"));
    assert_eq!(service.timeout(), Some(time::Duration::from_secs(30)));

    let config = ApiConfig {
        endpoint: None,
        timeout_secs: None,
    };
    let service = HttpService::from(&config);
    assert!(!service.is_configured());
}

#[test]
fn test_zero_timeout_means_no_timeout() {
    let config = ApiConfig {
        endpoint: Some("http://127.0.0.1:8000".to_string()),
        timeout_secs: Some(0),
    };
    assert_eq!(config.timeout(), None);

    let service = HttpService::from(&config);
    assert_eq!(service.timeout(), None);
}

#[test]
fn test_parse_body() {
    assert_eq!(parse_body(""), Value::Object(Default::default()));
    assert_eq!(parse_body("[1, 2]"), Value::Object(Default::default()));
    assert_eq!(parse_body(r#"{"detail":"x"}"#)["detail"], "x");
}
