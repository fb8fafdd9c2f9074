use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Clear, Padding},
};
use ratatui_macros::span;
use tui_textarea::Key;

use crate::models::Event;

use super::utils;

/// A yes/no prompt carrying the value it asks about.
#[derive(Default)]
pub struct Question<'a> {
    question: Line<'a>,
    title: Option<Line<'a>>,
    subject: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Answer {
    Yes(String),
    No,
}

impl<'a> Question<'a> {
    pub fn with_title(mut self, title: impl Into<Line<'a>>) -> Question<'a> {
        self.title = Some(title.into());
        self
    }

    pub fn showing(&self) -> bool {
        self.subject.is_some()
    }

    pub fn open(&mut self, question: impl Into<Line<'a>>, subject: impl Into<String>) {
        self.question = question.into();
        self.subject = Some(subject.into());
    }

    pub fn close(&mut self) {
        self.subject = None;
    }

    /// Returns the answer once the user made a choice, `None` while the
    /// prompt is still waiting.
    pub fn handle_key_event(&mut self, event: &Event) -> Option<Answer> {
        let answer = match event {
            Event::KeyboardEsc => Answer::No,
            Event::KeyboardCharInput(input) => match input.key {
                Key::Char('y') => Answer::Yes(self.subject.clone()?),
                Key::Char('n') | Key::Char('q') => Answer::No,
                _ => return None,
            },
            _ => return None,
        };
        self.close();
        Some(answer)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        if !self.showing() {
            return;
        }

        let max_width = (area.width as f32 * 0.8).ceil() as u16;
        let lines = utils::split_to_lines(
            self.question.spans.clone(),
            max_width.saturating_sub(4) as usize,
        );
        let area = build_area(area, max_width, lines.len() as u16 + 2);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::symmetric(1, 0))
            .title_bottom(vec![
                span!(" "),
                span!("y").green().bold(),
                span!(" to confirm, ").white(),
                span!("n").green().bold(),
                span!(" to cancel ").white(),
            ])
            .title_alignment(Alignment::Center)
            .border_style(Style::default().light_blue());

        if let Some(title) = &self.title {
            block = block.title(title.clone());
        }

        f.render_widget(Clear, area);
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Text::from(lines), inner);
    }
}

fn build_area(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height.saturating_sub(1) / 3).min(area.height - h);
    Rect::new(x, y, w, h)
}
