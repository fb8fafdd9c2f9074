use crate::models::Role;

use super::*;

fn with_sessions(ids: &[&str]) -> ControllerState {
    let sessions = ids
        .iter()
        .map(|id| Session::new(*id, format!("{id}.pdf")))
        .collect();
    ControllerState::default().reduce(Transition::SessionsUploaded(sessions))
}

fn ids(state: &ControllerState) -> Vec<&str> {
    state.sessions().iter().map(|s| s.id()).collect()
}

#[test]
fn test_sessions_uploaded_prepends_block() {
    let state = with_sessions(&["old1", "old2"]);
    let state = state.reduce(Transition::SessionsUploaded(vec![
        Session::new("n1", "n1.pdf"),
        Session::new("n2", "n2.pdf"),
    ]));

    assert_eq!(ids(&state), vec!["n1", "n2", "old1", "old2"]);
    assert_eq!(state.active_session_id(), Some("n1"));
    assert!(state.transcripts().contains_key("n1"));
    assert!(state.transcripts().contains_key("n2"));
    assert_eq!(state.transcript("n2").len(), 0);
}

#[test]
fn test_sessions_uploaded_empty_is_noop() {
    let state = with_sessions(&["s1"]);
    let next = state.clone().reduce(Transition::SessionsUploaded(vec![]));
    assert_eq!(next, state);
}

#[test]
fn test_select_session() {
    let state = with_sessions(&["s1", "s2"]);
    let state = state.reduce(Transition::SelectSession("s2".to_string()));
    assert_eq!(state.active_session_id(), Some("s2"));

    // Unknown ids keep the current selection
    let state = state.reduce(Transition::SelectSession("missing".to_string()));
    assert_eq!(state.active_session_id(), Some("s2"));
}

#[test]
fn test_append_message() {
    let state = with_sessions(&["s1", "s2"]);
    let state = state
        .reduce(Transition::AppendMessage {
            session_id: "s1".to_string(),
            message: ChatMessage::user("What is this?"),
        })
        .reduce(Transition::AppendMessage {
            session_id: "s1".to_string(),
            message: ChatMessage::bot("It is a report."),
        });

    let transcript = state.transcript("s1");
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role(), Role::User);
    assert_eq!(transcript[0].text(), "What is this?");
    assert_eq!(transcript[1].role(), Role::Bot);
    assert_eq!(transcript[1].text(), "It is a report.");
    assert!(state.transcript("s2").is_empty());

    // Messages for unknown sessions never create a transcript
    let state = state.reduce(Transition::AppendMessage {
        session_id: "ghost".to_string(),
        message: ChatMessage::user("hello"),
    });
    assert!(!state.transcripts().contains_key("ghost"));
}

#[test]
fn test_delete_inactive_session_keeps_others() {
    let state = with_sessions(&["s1", "s2", "s3"]).reduce(Transition::AppendMessage {
        session_id: "s3".to_string(),
        message: ChatMessage::user("keep me"),
    });

    let state = state.reduce(Transition::SessionDeleted("s2".to_string()));

    assert_eq!(ids(&state), vec!["s1", "s3"]);
    assert_eq!(state.active_session_id(), Some("s1"));
    assert!(!state.transcripts().contains_key("s2"));
    assert_eq!(state.transcript("s3")[0].text(), "keep me");
}

#[test]
fn test_delete_active_session_reassigns_first_remaining() {
    let state = with_sessions(&["s1", "s2", "s3"]);
    let state = state.reduce(Transition::SessionDeleted("s1".to_string()));
    assert_eq!(state.active_session_id(), Some("s2"));

    let state = state
        .reduce(Transition::SelectSession("s3".to_string()))
        .reduce(Transition::SessionDeleted("s3".to_string()));
    assert_eq!(state.active_session_id(), Some("s2"));
}

#[test]
fn test_delete_sole_session() {
    let state = with_sessions(&["s1"]).reduce(Transition::SessionDeleted("s1".to_string()));

    assert!(state.sessions().is_empty());
    assert!(state.transcripts().is_empty());
    assert_eq!(state.active_session_id(), None);
    assert!(state.active_transcript().is_empty());
}

#[test]
fn test_delete_unknown_session_is_noop() {
    let state = with_sessions(&["s1"]);
    let next = state
        .clone()
        .reduce(Transition::SessionDeleted("s9".to_string()));
    assert_eq!(next, state);
}

#[test]
fn test_pending_files_and_draft() {
    let state = ControllerState::default()
        .reduce(Transition::SelectFiles(vec![
            PendingFile::new("a.pdf"),
            PendingFile::new("b.pdf"),
        ]))
        .reduce(Transition::SetDraft("Summarize".to_string()))
        .reduce(Transition::SetBusy(true));

    assert_eq!(state.pending_files().len(), 2);
    assert_eq!(state.draft_question(), "Summarize");
    assert!(state.busy());

    let state = state
        .reduce(Transition::ClearPendingFiles)
        .reduce(Transition::ClearDraft)
        .reduce(Transition::SetBusy(false));
    assert!(state.pending_files().is_empty());
    assert!(state.draft_question().is_empty());
    assert!(!state.busy());
}
