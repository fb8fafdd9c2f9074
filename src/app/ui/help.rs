use std::fmt::Display;

use once_cell::sync::Lazy;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Cell, Clear, Padding, Row, Table, TableState},
};
use ratatui_macros::span;
use tui_textarea::Key;

use crate::models::Event;

use super::utils;

pub static KEY_BINDINGS: Lazy<Vec<KeyBinding>> = Lazy::new(build_key_bindings);

pub struct HelpScreen<'a> {
    showing: bool,
    state: TableState,
    rows: Vec<Row<'a>>,
    last_known_width: usize,
}

impl<'a> HelpScreen<'a> {
    pub fn new() -> HelpScreen<'a> {
        HelpScreen {
            showing: false,
            state: TableState::default().with_selected(0),
            rows: vec![],
            last_known_width: 0,
        }
    }

    pub fn showing(&self) -> bool {
        self.showing
    }

    pub fn toggle_showing(&mut self) {
        self.showing = !self.showing;
    }

    fn next_row(&mut self) {
        let last = KEY_BINDINGS.len().saturating_sub(1);
        let i = self.state.selected().map(|i| (i + 1).min(last)).unwrap_or(0);
        self.state.select(Some(i));
    }

    fn prev_row(&mut self) {
        let i = self.state.selected().unwrap_or_default().saturating_sub(1);
        self.state.select(Some(i));
    }

    pub fn handle_key_event(&mut self, event: &Event) {
        match event {
            Event::KeyboardF1 | Event::KeyboardEsc => self.showing = false,

            Event::KeyboardCharInput(input) => match input.key {
                Key::Char('j') => self.next_row(),
                Key::Char('k') => self.prev_row(),
                Key::Char('q') => self.showing = false,
                _ => {}
            },

            Event::UiScrollDown => self.next_row(),
            Event::UiScrollUp => self.prev_row(),

            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.showing {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::symmetric(1, 0))
            .title(Line::from(" Help ").bold())
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(vec![
                " ".into(),
                span!(Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD); "q"),
                " to close ".into(),
                span!(Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD); "k/j"),
                " to move up/down ".into(),
            ]));
        frame.render_widget(Clear, area);

        if self.last_known_width != area.width as usize {
            self.last_known_width = area.width as usize;
            self.rows = build_rows((area.width as f32 * 0.6).ceil() as usize);
        }

        let table = Table::new(
            self.rows.clone(),
            [Constraint::Percentage(30), Constraint::Percentage(70)],
        )
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(table, area, &mut self.state);
    }

    pub fn render_help_line(&self, frame: &mut Frame, area: Rect) {
        let mut instructions = KEY_BINDINGS
            .iter()
            .filter(|b| !b.short_description.is_empty())
            .flat_map(|b| {
                vec![
                    span!(Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD); b.key().to_string()),
                    " ".into(),
                    span!(Style::default().fg(Color::White); b.short_description.clone()),
                    " | ".into(),
                ]
            })
            .collect::<Vec<_>>();
        instructions.pop();

        frame.render_widget(Line::from(instructions).light_green(), area);
    }
}

impl Default for HelpScreen<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn build_rows<'a>(max_width: usize) -> Vec<Row<'a>> {
    KEY_BINDINGS
        .iter()
        .map(|binding| {
            let desc = utils::split_to_lines(binding.long_description().to_string(), max_width);
            let height = desc.len().max(1) as u16;
            Row::new(vec![
                Cell::from(binding.key().to_string()),
                Cell::from(Text::from(desc)),
            ])
            .height(height)
        })
        .collect()
}

fn build_key_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new(Input::new(Key::F(1)), "Show/hide this help").with_short_desc("Help"),
        KeyBinding::new(Input::new(Key::Char('o')).ctrl(), "[O]pen the file picker")
            .with_short_desc("Open"),
        KeyBinding::new(Input::new(Key::Char('u')).ctrl(), "[U]pload the pending files")
            .with_short_desc("Upload"),
        KeyBinding::new(Input::new(Key::Tab), "Focus the document list")
            .with_short_desc("Documents"),
        KeyBinding::new(Input::new(Key::Enter), "Send the question to the active document"),
        KeyBinding::new(Input::new(Key::Enter).alt(), "Insert a new line"),
        KeyBinding::new(Input::new(Key::Char('c')).ctrl(), "[C]lear the question"),
        KeyBinding::new(Input::new(Key::Char('q')).ctrl(), "[Q]uit").with_short_desc("Quit"),
        KeyBinding::new(Input::new(Key::Up), "Scroll the transcript up"),
        KeyBinding::new(Input::new(Key::Down), "Scroll the transcript down"),
        KeyBinding::new(Input::new(Key::PageUp), "Scroll the transcript a page up"),
        KeyBinding::new(Input::new(Key::PageDown), "Scroll the transcript a page down"),
        KeyBinding::new(Input::new(Key::Char('j')), "Document list / picker: move down"),
        KeyBinding::new(Input::new(Key::Char('k')), "Document list / picker: move up"),
        KeyBinding::new(Input::new(Key::Char('d')), "Document list: delete the document"),
        KeyBinding::new(Input::new(Key::Char(' ')), "Picker: mark/unmark a PDF file"),
        KeyBinding::new(Input::new(Key::Backspace), "Picker: go to the parent directory"),
        KeyBinding::new(Input::new(Key::Esc), "Close the popup or leave the list"),
    ]
}

pub struct Input {
    key: Key,
    ctrl: bool,
    alt: bool,
}

impl Input {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

pub struct KeyBinding {
    key: Input,
    long_description: String,
    short_description: String,
}

impl KeyBinding {
    fn new(key: Input, description: &str) -> Self {
        Self {
            key,
            long_description: description.to_string(),
            short_description: String::new(),
        }
    }

    fn with_short_desc(mut self, short_description: &str) -> Self {
        self.short_description = short_description.to_string();
        self
    }

    pub fn key(&self) -> &Input {
        &self.key
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut modifier = String::new();
        if self.ctrl {
            modifier.push_str("Ctrl+");
        }
        if self.alt {
            modifier.push_str("Alt+");
        }

        let key = match self.key {
            Key::Char(' ') => "Space".to_string(),
            Key::Char(c) => c.to_string(),
            Key::F(n) => format!("F{}", n),
            Key::Backspace => "Backspace".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Up => "Up".to_string(),
            Key::Down => "Down".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::PageUp => "PageUp".to_string(),
            Key::PageDown => "PageDown".to_string(),
            Key::Esc => "Esc".to_string(),
            _ => "Unknown".to_string(),
        };

        write!(f, "{}{}", modifier, key)
    }
}
