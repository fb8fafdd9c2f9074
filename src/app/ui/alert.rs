use std::collections::VecDeque;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Clear, Padding},
};
use ratatui_macros::span;
use tui_textarea::Key;

use crate::models::{Event, NoticeMessage};

use super::{Dim, utils};

/// Blocking modal notifications. While an alert is showing it swallows every
/// key until dismissed; queued alerts are shown one after another.
#[derive(Default)]
pub struct Alert {
    queue: VecDeque<NoticeMessage>,
}

impl Alert {
    pub fn showing(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn push(&mut self, message: NoticeMessage) {
        self.queue.push_back(message);
    }

    pub fn current(&self) -> Option<&NoticeMessage> {
        self.queue.front()
    }

    /// Returns true when the current alert got dismissed.
    pub fn handle_key_event(&mut self, event: &Event) -> bool {
        let dismiss = match event {
            Event::KeyboardEnter | Event::KeyboardEsc => true,
            Event::KeyboardCharInput(input) => input.key == Key::Char('q'),
            _ => false,
        };
        if dismiss {
            self.queue.pop_front();
        }
        dismiss
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let Some(message) = self.current() else {
            return;
        };

        let kind = message.kind();
        let max_width = ((area.width as f32 * 0.5).ceil() as u16).max(20).min(area.width);
        let lines = utils::split_to_lines(
            message.message().to_string(),
            max_width.saturating_sub(4) as usize,
        );
        let height = (lines.len() as u16 + 2).min(area.height);
        let x = area.x + (area.width - max_width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 3;
        let popup = Rect::new(x, y, max_width, height);

        let mut title_bottom = vec![span!(" ")];
        title_bottom.push(span!("Enter").green().bold());
        title_bottom.push(span!(" to dismiss").white());
        if self.queue.len() > 1 {
            title_bottom.push(span!(format!(" (+{} more)", self.queue.len() - 1)).gray());
        }
        title_bottom.push(span!(" "));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::symmetric(1, 0))
            .title(Line::from(kind.title()).bold())
            .title_bottom(title_bottom)
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(kind.border_color()));

        f.dim_bg();
        f.render_widget(Clear, popup);
        let inner = block.inner(popup);
        f.render_widget(block, popup);
        f.render_widget(
            Text::from(lines).style(Style::default().fg(kind.text_color())),
            inner,
        );
    }
}
