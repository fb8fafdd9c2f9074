#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph},
};
use ratatui_macros::span;
use tokio::sync::mpsc;
use tui_textarea::Key;

use crate::controller::ControllerState;
use crate::models::{Action, Event, PendingFile, Session};
use crate::notice_warning;

use super::question::{Answer, Question};
use super::utils;

const NO_DOCUMENTS: &str = "No documents yet";
const BUSY_WARNING: &str = "Please wait for the current request to finish...";
const MAX_PENDING_ROWS: usize = 5;

/// Left-hand panel listing the uploaded documents and the files waiting to
/// be uploaded.
pub struct SessionsPanel<'a> {
    focused: bool,

    action_tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,

    sessions: Vec<Session>,
    active_session_id: Option<String>,
    pending_files: Vec<PendingFile>,
    busy: bool,

    question: Question<'a>,
    list_state: ListState,
}

impl<'a> SessionsPanel<'a> {
    pub fn new(
        action_tx: mpsc::UnboundedSender<Action>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> SessionsPanel<'a> {
        SessionsPanel {
            focused: false,
            action_tx,
            event_tx,
            sessions: vec![],
            active_session_id: None,
            pending_files: vec![],
            busy: false,
            question: Question::default().with_title(" Delete Document "),
            list_state: ListState::default(),
        }
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.move_cursor_to_active();
        }
    }

    pub fn set_state(&mut self, state: &ControllerState) {
        let active_changed = self.active_session_id.as_deref() != state.active_session_id();

        self.sessions = state.sessions().to_vec();
        self.active_session_id = state.active_session_id().map(str::to_string);
        self.pending_files = state.pending_files().to_vec();
        self.busy = state.busy();

        if active_changed || self.selected_session().is_none() {
            self.move_cursor_to_active();
        }
    }

    pub fn selected_session(&self) -> Option<&Session> {
        self.list_state.selected().and_then(|i| self.sessions.get(i))
    }

    fn move_cursor_to_active(&mut self) {
        let pos = self
            .active_session_id
            .as_deref()
            .and_then(|id| self.sessions.iter().position(|s| s.id() == id))
            .or(if self.sessions.is_empty() { None } else { Some(0) });
        self.list_state.select(pos);
    }

    fn next_row(&mut self) {
        if self.sessions.is_empty() {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.sessions.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn prev_row(&mut self) {
        if self.sessions.is_empty() {
            self.list_state.select(None);
            return;
        }
        let i = self.list_state.selected().unwrap_or_default().saturating_sub(1);
        self.list_state.select(Some(i));
    }

    fn first(&mut self) {
        if !self.sessions.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn last(&mut self) {
        if !self.sessions.is_empty() {
            self.list_state.select(Some(self.sessions.len() - 1));
        }
    }

    pub fn handle_key_event(&mut self, event: &Event) {
        if self.question.showing() {
            if let Some(Answer::Yes(id)) = self.question.handle_key_event(event) {
                self.on_delete(id);
            }
            return;
        }

        match event {
            Event::KeyboardTab | Event::KeyboardEsc => self.focused = false,

            Event::KeyboardEnter => self.on_select(),

            Event::KeyboardCharInput(input) => match input.key {
                Key::Char('j') | Key::Down => self.next_row(),
                Key::Char('k') | Key::Up => self.prev_row(),
                Key::Char('g') => self.first(),
                Key::Char('G') => self.last(),
                Key::Char('q') => self.focused = false,
                Key::Char('d') | Key::Delete => self.on_request_delete(),
                _ => {}
            },

            Event::UiScrollUp => self.prev_row(),
            Event::UiScrollDown => self.next_row(),

            _ => {}
        }
    }

    fn on_select(&mut self) {
        let Some(id) = self.selected_session().map(|s| s.id().to_string()) else {
            return;
        };
        if self.warn_if_busy() {
            return;
        }
        if self.active_session_id.as_deref() != Some(id.as_str()) {
            self.action_tx.send(Action::SelectSession(id)).ok();
        }
        self.focused = false;
    }

    fn on_request_delete(&mut self) {
        let Some(session) = self.selected_session().cloned() else {
            return;
        };
        if self.warn_if_busy() {
            return;
        }

        let quest = vec![
            span!("Do you want to delete "),
            span!(format!("\"{}\"", session.name()))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC)
                .yellow(),
            span!("?"),
        ];
        self.question.open(quest, session.id());
    }

    fn on_delete(&mut self, id: String) {
        if self.warn_if_busy() {
            return;
        }
        self.action_tx.send(Action::DeleteSession(id)).ok();
    }

    fn warn_if_busy(&self) -> bool {
        if self.busy {
            self.event_tx.send(notice_warning!(BUSY_WARNING)).ok();
        }
        self.busy
    }

    fn build_list_items(&self, max_width: usize) -> Vec<ListItem<'static>> {
        if self.sessions.is_empty() {
            return vec![ListItem::new(
                Text::from(NO_DOCUMENTS).alignment(Alignment::Center).gray(),
            )];
        }

        self.sessions
            .iter()
            .map(|session| {
                let active = self.active_session_id.as_deref() == Some(session.id());
                let marker = if active {
                    Span::styled("[*] ", Style::default().fg(Color::LightRed))
                } else {
                    Span::raw("    ")
                };
                let lines = utils::split_to_lines(
                    vec![marker, Span::raw(session.name().to_string())],
                    max_width,
                );
                ListItem::new(Text::from(lines))
            })
            .collect()
    }

    fn build_pending_lines(&self, max_width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(format!("{} file(s) pending", self.pending_files.len()))
                .yellow()
                .bold(),
        ];
        for file in self.pending_files.iter().take(MAX_PENDING_ROWS) {
            let name = file.name();
            let name = if name.chars().count() > max_width.saturating_sub(2) {
                let cut = name
                    .chars()
                    .take(max_width.saturating_sub(5))
                    .collect::<String>();
                format!("{cut}...")
            } else {
                name.to_string()
            };
            lines.push(Line::from(format!("- {name}")).gray());
        }
        if self.pending_files.len() > MAX_PENDING_ROWS {
            lines.push(
                Line::from(format!(
                    "  and {} more",
                    self.pending_files.len() - MAX_PENDING_ROWS
                ))
                .gray(),
            );
        }
        lines
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let border = if self.focused {
            Color::LightBlue
        } else {
            Color::DarkGray
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .padding(Padding::new(1, 1, 0, 0))
            .title(Line::from(" Documents ").bold())
            .title_alignment(Alignment::Center);

        if self.focused {
            block = block.title_bottom(Line::from(vec![
                " ".into(),
                span!("Enter").green().bold(),
                span!(" select, ").white(),
                span!("d").green().bold(),
                span!(" delete ").white(),
            ]));
        }

        let inner = block.inner(area);
        f.render_widget(block, area);
        let max_width = inner.width as usize;

        let pending_height = if self.pending_files.is_empty() {
            0
        } else {
            (self.pending_files.len().min(MAX_PENDING_ROWS) + 2) as u16 + 1
        };
        let [list_area, pending_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(pending_height)])
                .areas(inner);

        let list = List::new(self.build_list_items(max_width.saturating_sub(2)))
            .highlight_style(if self.focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            });
        f.render_stateful_widget(list, list_area, &mut self.list_state);

        if pending_height > 0 {
            let pending = Paragraph::new(self.build_pending_lines(max_width)).block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(pending, pending_area);
        }
    }

    pub fn render_question(&self, f: &mut Frame, area: Rect) {
        self.question.render(f, area);
    }
}
