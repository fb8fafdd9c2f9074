use tokio::sync::mpsc;
use tui_textarea::{Input, Key};

use crate::controller::{ControllerState, Transition};
use crate::models::{Action, Event, NoticeKind, Session};

use super::*;

fn key(c: char) -> Event {
    Event::KeyboardCharInput(Input {
        key: Key::Char(c),
        ..Default::default()
    })
}

fn state(ids: &[&str]) -> ControllerState {
    let sessions = ids
        .iter()
        .map(|id| Session::new(*id, format!("{id}.pdf")))
        .collect();
    ControllerState::default().reduce(Transition::SessionsUploaded(sessions))
}

fn panel<'a>() -> (
    SessionsPanel<'a>,
    mpsc::UnboundedReceiver<Action>,
    mpsc::UnboundedReceiver<Event>,
) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (SessionsPanel::new(action_tx, event_tx), action_rx, event_rx)
}

#[test]
fn test_cursor_follows_active_session() {
    let (mut panel, _, _) = panel();
    panel.set_state(&state(&["s1", "s2"]).reduce(Transition::SelectSession("s2".into())));
    assert_eq!(panel.selected_session().map(|s| s.id()), Some("s2"));

    panel.set_state(&ControllerState::default());
    assert!(panel.selected_session().is_none());
}

#[test]
fn test_select_sends_action() {
    let (mut panel, mut action_rx, _) = panel();
    panel.set_state(&state(&["s1", "s2"]));
    panel.set_focus(true);

    panel.handle_key_event(&key('j'));
    panel.handle_key_event(&Event::KeyboardEnter);

    match action_rx.try_recv() {
        Ok(Action::SelectSession(id)) => assert_eq!(id, "s2"),
        other => panic!("unexpected action: {:?}", other),
    }
    assert!(!panel.focused());
}

#[test]
fn test_selecting_active_session_sends_nothing() {
    let (mut panel, mut action_rx, _) = panel();
    panel.set_state(&state(&["s1", "s2"]));
    panel.set_focus(true);

    panel.handle_key_event(&Event::KeyboardEnter);
    assert!(action_rx.try_recv().is_err());
}

#[test]
fn test_delete_asks_before_sending() {
    let (mut panel, mut action_rx, _) = panel();
    panel.set_state(&state(&["s1", "s2"]));
    panel.set_focus(true);

    panel.handle_key_event(&key('d'));
    assert!(action_rx.try_recv().is_err());

    panel.handle_key_event(&key('n'));
    assert!(action_rx.try_recv().is_err());

    panel.handle_key_event(&key('d'));
    panel.handle_key_event(&key('y'));
    match action_rx.try_recv() {
        Ok(Action::DeleteSession(id)) => assert_eq!(id, "s1"),
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn test_busy_blocks_actions() {
    let (mut panel, mut action_rx, mut event_rx) = panel();
    panel.set_state(&state(&["s1", "s2"]).reduce(Transition::SetBusy(true)));
    panel.set_focus(true);

    panel.handle_key_event(&key('j'));
    panel.handle_key_event(&Event::KeyboardEnter);
    panel.handle_key_event(&key('d'));

    assert!(action_rx.try_recv().is_err());
    match event_rx.try_recv() {
        Ok(Event::Notice(notice)) => assert_eq!(notice.kind(), &NoticeKind::Warning),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_tab_releases_focus() {
    let (mut panel, _, _) = panel();
    panel.set_focus(true);
    panel.handle_key_event(&Event::KeyboardTab);
    assert!(!panel.focused());
}
