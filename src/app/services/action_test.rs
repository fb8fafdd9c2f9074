use std::sync::Arc;

use mockall::predicate::eq;
use tokio::sync::mpsc;

use crate::backend::{AskResponse, MockDocumentService, ServiceError, UploadResponse};
use crate::controller::{ControllerState, Transition};
use crate::models::NoticeKind;

use super::*;

fn configured() -> MockDocumentService {
    let mut service = MockDocumentService::new();
    service.expect_is_configured().return_const(true);
    service
}

fn with_session(id: &str) -> ControllerState {
    ControllerState::default().reduce(Transition::SessionsUploaded(vec![Session::new(
        id,
        format!("{id}.pdf"),
    )]))
}

fn service(
    mock: MockDocumentService,
    state: ControllerState,
) -> (ActionService, mpsc::UnboundedReceiver<Event>) {
    let (_action_tx, action_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let controller = SessionController::new(Arc::new(mock)).with_state(state);
    let service = ActionService::new(
        controller,
        action_rx,
        Arc::new(event_tx),
        CancellationToken::new(),
    );
    (service, event_rx)
}

fn expect_alert(event_rx: &mut mpsc::UnboundedReceiver<Event>, kind: NoticeKind) -> String {
    match event_rx.try_recv() {
        Ok(Event::Alert(notice)) => {
            assert_eq!(notice.kind(), &kind);
            notice.message().to_string()
        }
        other => panic!("expected an alert, got {:?}", other),
    }
}

fn expect_notice(event_rx: &mut mpsc::UnboundedReceiver<Event>) -> String {
    match event_rx.try_recv() {
        Ok(Event::Notice(notice)) => notice.message().to_string(),
        other => panic!("expected a notice, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upload_success_shows_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let mut mock = configured();
    mock.expect_upload().times(1).returning(|_| {
        Ok(UploadResponse {
            session_id: "s1".to_string(),
            filename: Some("a.pdf".to_string()),
        })
    });

    let (mut service, mut event_rx) = service(mock, ControllerState::default());
    service
        .handle(Action::SelectFiles(vec![PendingFile::new(&path)]))
        .await
        .unwrap();
    expect_notice(&mut event_rx);

    service.handle(Action::UploadPending).await.unwrap();
    assert_eq!(
        expect_alert(&mut event_rx, NoticeKind::Info),
        "\"a.pdf\" uploaded successfully."
    );
    assert_eq!(service.controller.state().active_session_id(), Some("s1"));
    assert!(service.controller.state().pending_files().is_empty());
}

#[tokio::test]
async fn test_upload_without_files_alerts() {
    let mut mock = MockDocumentService::new();
    mock.expect_upload().never();

    let (mut service, mut event_rx) = service(mock, ControllerState::default());
    service.handle(Action::UploadPending).await.unwrap();

    assert_eq!(
        expect_alert(&mut event_rx, NoticeKind::Error),
        "Please select at least one PDF file."
    );
}

#[tokio::test]
async fn test_question_answered() {
    let mut mock = configured();
    mock.expect_ask()
        .with(eq("s1"), eq("What is this?"))
        .times(1)
        .returning(|_, _| {
            Ok(AskResponse {
                answer: Some("It is a report.".to_string()),
            })
        });

    let (mut service, mut event_rx) = service(mock, with_session("s1"));
    service
        .handle(Action::SubmitQuestion("What is this?".to_string()))
        .await
        .unwrap();

    assert!(matches!(
        event_rx.try_recv(),
        Ok(Event::QuestionAnswered(text)) if text == "What is this?"
    ));
    assert_eq!(service.controller.state().transcript("s1").len(), 2);
    assert!(service.controller.state().draft_question().is_empty());
}

#[tokio::test]
async fn test_question_failure_alerts_and_keeps_draft() {
    let mut mock = configured();
    mock.expect_ask().times(1).returning(|_, _| {
        Err(ServiceError::Status {
            status: 404,
            message: "Not found".to_string(),
        })
    });

    let (mut service, mut event_rx) = service(mock, with_session("s1"));
    service
        .handle(Action::SubmitQuestion("What is this?".to_string()))
        .await
        .unwrap();

    assert_eq!(expect_alert(&mut event_rx, NoticeKind::Error), "Not found");
    assert_eq!(service.controller.state().draft_question(), "What is this?");
    assert_eq!(service.controller.state().transcript("s1").len(), 1);
}

#[tokio::test]
async fn test_blank_question_is_silent() {
    let mut mock = configured();
    mock.expect_ask().never();

    let (mut service, mut event_rx) = service(mock, with_session("s1"));
    service
        .handle(Action::SubmitQuestion("   ".to_string()))
        .await
        .unwrap();

    assert!(event_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_delete_reports_document_name() {
    let mut mock = configured();
    mock.expect_delete()
        .with(eq("s1"))
        .times(1)
        .returning(|_| Ok(()));

    let (mut service, mut event_rx) = service(mock, with_session("s1"));
    service
        .handle(Action::DeleteSession("s1".to_string()))
        .await
        .unwrap();

    assert_eq!(expect_notice(&mut event_rx), "Deleted \"s1.pdf\"");
    assert!(service.controller.state().sessions().is_empty());
}

#[tokio::test]
async fn test_select_unknown_session_alerts() {
    let (mut service, mut event_rx) = service(MockDocumentService::new(), with_session("s1"));
    service
        .handle(Action::SelectSession("s9".to_string()))
        .await
        .unwrap();

    assert_eq!(
        expect_alert(&mut event_rx, NoticeKind::Error),
        "Unknown document."
    );
}

#[tokio::test]
async fn test_start_stops_on_cancel() {
    let (_action_tx, action_rx) = mpsc::unbounded_channel();
    let (event_tx, _event_rx) = mpsc::unbounded_channel::<Event>();
    let cancel_token = CancellationToken::new();
    let mut service = ActionService::new(
        SessionController::new(Arc::new(MockDocumentService::new())),
        action_rx,
        Arc::new(event_tx),
        cancel_token.clone(),
    );

    cancel_token.cancel();
    service.start().await.unwrap();
}
