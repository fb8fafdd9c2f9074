use std::io;
use std::path::PathBuf;

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    prelude::{Backend, CrosstermBackend},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};
use ratatui_macros::span;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app::ui::{
    Alert, BubbleList, FilePicker, HelpScreen, Loading, Notice, Scroll, SessionsPanel, TextArea,
    utils,
};
use crate::controller::ControllerState;
use crate::models::{Action, Event};
use crate::warn_notice;

use super::services::EventService;

const MIN_WIDTH: u16 = 80;
const MAX_INPUT_LINES: usize = 8;
const BUSY_WARNING: &str = "Please wait for the current request to finish...";
const NO_DOCUMENTS_HINT: &str =
    "No documents yet. Press Ctrl+O to pick PDF files, then Ctrl+U to upload them.";

pub struct App<'a> {
    action_tx: mpsc::UnboundedSender<Action>,

    events: &'a mut EventService,

    state: ControllerState,
    bubble_list: BubbleList,
    scroll: Scroll,
    last_known_width: usize,
    last_known_height: usize,

    sessions_panel: SessionsPanel<'a>,
    picker: FilePicker,
    help_screen: HelpScreen<'a>,
    alert: Alert,
    notice: Notice,
    loading: Loading<'a>,
    input: tui_textarea::TextArea<'a>,

    cancel_token: CancellationToken,
}

impl<'a> App<'a> {
    pub fn new(
        action_tx: mpsc::UnboundedSender<Action>,
        events: &'a mut EventService,
        picker_dir: PathBuf,
        cancel_token: CancellationToken,
    ) -> App<'a> {
        let event_tx = events.event_tx();
        App {
            action_tx: action_tx.clone(),
            events,
            state: ControllerState::default(),
            bubble_list: BubbleList::default(),
            scroll: Scroll::default(),
            last_known_width: 0,
            last_known_height: 0,
            sessions_panel: SessionsPanel::new(action_tx, event_tx.clone()),
            picker: FilePicker::new(event_tx, picker_dir),
            help_screen: HelpScreen::new(),
            alert: Alert::default(),
            notice: Notice::default(),
            loading: Loading::new(vec![
                span!("Working... ").gray(),
                span!("Ctrl+q").green().bold(),
                span!(" to quit").gray(),
            ]),
            input: TextArea::default().build(),
            cancel_token,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        enable_raw_mode()?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;

        let term_backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(term_backend)?;
        let result = self.start_loop(&mut terminal).await;

        self.cancel_token.cancel();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;

        terminal.show_cursor()?;
        result
    }

    async fn start_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.render(terminal)?;
            if self.handle_key_event().await {
                return Ok(());
            }
        }
    }

    async fn handle_key_event(&mut self) -> bool {
        let event = self.events.next().await;

        if let Some(stop) = self.handle_global_event(&event) {
            return stop;
        }

        // Alerts block everything else until dismissed
        if self.alert.showing() {
            self.alert.handle_key_event(&event);
            return false;
        }

        if self.help_screen.showing() {
            self.help_screen.handle_key_event(&event);
            return false;
        }

        if self.picker.showing() {
            self.picker.handle_key_event(&event);
            return false;
        }

        if self.sessions_panel.focused() {
            self.sessions_panel.handle_key_event(&event);
            return false;
        }

        self.handle_input_event(event);
        false
    }

    fn handle_global_event(&mut self, event: &Event) -> Option<bool> {
        match event {
            Event::Quit => Some(true),

            Event::UiTick => {
                self.loading.tick();
                Some(false)
            }

            Event::StateChanged(state) => {
                self.apply_state(state.as_ref().clone());
                Some(false)
            }

            Event::QuestionAnswered(text) => {
                TextArea::default().clear_if_holds(&mut self.input, text);
                Some(false)
            }

            Event::FilesPicked(files) => {
                self.action_tx.send(Action::SelectFiles(files.clone())).ok();
                Some(false)
            }

            Event::Notice(msg) => {
                self.notice.add_message(msg.clone());
                Some(false)
            }

            Event::Alert(msg) => {
                self.alert.push(msg.clone());
                Some(false)
            }

            // Fallthrough to the screen handlers
            _ => None,
        }
    }

    fn handle_input_event(&mut self, event: Event) {
        match event {
            Event::KeyboardCharInput(input) => {
                if !self.state.busy() {
                    self.input.input(input);
                }
            }

            Event::KeyboardPaste(text) => {
                if !self.state.busy() {
                    self.input.set_yank_text(text.replace('\r', "\n"));
                    self.input.paste();
                }
            }

            Event::KeyboardNewLine => {
                if !self.on_busy(false) {
                    self.input.insert_newline();
                }
            }

            Event::KeyboardCtrlC => {
                if !self.state.busy() {
                    self.input = TextArea::default().build();
                }
            }

            Event::KeyboardEnter => self.handle_send_question(),

            Event::KeyboardCtrlO => {
                if !self.on_busy(true) {
                    self.picker.open();
                }
            }

            Event::KeyboardCtrlU => {
                if !self.on_busy(true) {
                    self.action_tx.send(Action::UploadPending).ok();
                }
            }

            Event::KeyboardTab => self.sessions_panel.set_focus(true),
            Event::KeyboardF1 => self.help_screen.toggle_showing(),

            Event::UiScrollDown => self.scroll.down(),
            Event::UiScrollUp => self.scroll.up(),
            Event::UiScrollPageDown => self.scroll.page_down(),
            Event::UiScrollPageUp => self.scroll.page_up(),
            _ => {}
        }
    }

    fn handle_send_question(&mut self) {
        if self.on_busy(true) {
            return;
        }

        let text = self.input.lines().join("\n");
        if text.trim().is_empty() {
            return;
        }

        // The input is cleared once the answer arrives, a failed question
        // stays editable
        self.action_tx.send(Action::SubmitQuestion(text)).ok();
    }

    fn apply_state(&mut self, state: ControllerState) {
        let session_changed = self.state.active_session_id() != state.active_session_id();
        self.sessions_panel.set_state(&state);
        self.state = state;
        self.sync_transcript(session_changed);
    }

    fn sync_transcript(&mut self, jump_to_last: bool) {
        let follow = jump_to_last || self.scroll.is_position_at_last();
        self.bubble_list.set_messages(
            self.state.active_session_id(),
            self.state.active_transcript(),
            self.last_known_width,
        );
        self.scroll
            .set_state(self.bubble_list.len(), self.last_known_height);
        if follow {
            self.scroll.last();
        }
    }

    fn set_rect(&mut self, rect: Rect) {
        let width = rect.width as usize;
        let height = rect.height as usize;
        if width == self.last_known_width && height == self.last_known_height {
            return;
        }
        self.last_known_width = width;
        self.last_known_height = height;
        self.sync_transcript(false);
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| {
            let current_width = f.area().width;
            if current_width < MIN_WIDTH {
                f.render_widget(
                    Paragraph::new(utils::split_to_lines(
                        format!(
                            "I'm too small, make me bigger! I need at least {} cells (current: {})",
                            MIN_WIDTH, current_width
                        ),
                        current_width.saturating_sub(2) as usize,
                    ))
                    .alignment(Alignment::Left),
                    f.area(),
                );
                return;
            }

            let [left, right] =
                Layout::horizontal([Constraint::Percentage(30), Constraint::Min(40)])
                    .areas(f.area());
            self.sessions_panel.render(f, left);
            self.render_conversation(f, right);

            let full = f.area();
            self.help_screen.render(f, utils::popup_area(full, 60, 60));
            self.picker.render(f, utils::popup_area(full, 70, 80));
            self.sessions_panel.render_question(f, full);
            self.alert.render(f, full);
            self.notice.render(f, utils::notice_area(full, 30));
        })?;
        Ok(())
    }

    fn render_conversation(&mut self, f: &mut Frame, area: Rect) {
        let input_len = (self.input.lines().len().min(MAX_INPUT_LINES) + 2) as u16;
        let [transcript_area, input_area, help_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(input_len),
            Constraint::Length(1),
        ])
        .areas(area);

        let title = match self.state.active_session() {
            Some(session) => format!(" {} ", session.name()),
            None => " No document selected ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(title).bold())
            .title_alignment(Alignment::Center);
        let inner = block.inner(transcript_area);
        f.render_widget(block, transcript_area);

        // Keep a column free for the scrollbar
        let bubbles_area = Rect {
            width: inner.width.saturating_sub(1),
            ..inner
        };
        self.set_rect(bubbles_area);

        if self.bubble_list.is_empty() {
            let hint = match self.state.active_session() {
                Some(session) => format!("Ask anything about \"{}\".", session.name()),
                None if self.state.sessions().is_empty() => NO_DOCUMENTS_HINT.to_string(),
                None => "Press Tab to pick a document.".to_string(),
            };
            f.render_widget(
                Paragraph::new(hint)
                    .gray()
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                bubbles_area.inner(Margin {
                    vertical: bubbles_area.height / 3,
                    horizontal: 1,
                }),
            );
        } else {
            self.bubble_list
                .render(bubbles_area, f.buffer_mut(), self.scroll.position);
            f.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .end_symbol(None)
                    .begin_symbol(None),
                inner,
                &mut self.scroll.scrollbar_state,
            );
        }

        if self.state.busy() {
            self.loading.render(f, input_area);
        } else {
            TextArea::default()
                .with_focus(!self.sessions_panel.focused())
                .apply(&mut self.input);
            f.render_widget(&self.input, input_area);
        }

        self.help_screen.render_help_line(f, help_area);
    }

    fn on_busy(&mut self, notice: bool) -> bool {
        if self.state.busy() && notice {
            self.notice.add_message(warn_notice!(BUSY_WARNING));
        }
        self.state.busy()
    }
}
