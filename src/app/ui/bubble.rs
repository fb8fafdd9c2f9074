#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::config;
use crate::models::ChatMessage;

use super::utils;

pub const DEFAULT_PADDING: usize = 8;
pub const DEFAULT_BORDER_ELEMENTS_LEN: usize = 5;
pub const DEFAULT_OUTER_PADDING_PERCENTAGE: f32 = 0.04;

const TIME_FORMAT: &str = "%H:%M %m/%d";

/// Renders one message as a bordered bubble. Answers hug the left edge,
/// questions the right one.
pub struct Bubble<'a> {
    message: &'a ChatMessage,
    max_width: usize,
    padding: usize,
    border_elements_length: usize,
    outer_padding_percentage: f32,
    width_percent: usize,
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a ChatMessage, max_width: usize) -> Bubble<'a> {
        Bubble {
            message,
            max_width,
            // Unicode border + inner padding on both sides
            padding: DEFAULT_PADDING,
            // left border + left padding + right padding + right border + scrollbar
            border_elements_length: DEFAULT_BORDER_ELEMENTS_LEN,
            outer_padding_percentage: DEFAULT_OUTER_PADDING_PERCENTAGE,
            width_percent: config::instance().general.bubble_width_percent,
        }
    }

    pub fn with_width_percent(mut self, width_percent: usize) -> Self {
        self.width_percent = width_percent;
        self
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_len = self.max_line_length();

        let mut lines = vec![];
        for paragraph in self.message.text().lines() {
            if paragraph.trim().is_empty() {
                lines.push(self.format_line(String::new(), max_line_len));
                continue;
            }
            for line in utils::split_to_lines(paragraph.to_string(), max_line_len) {
                let text = line
                    .spans
                    .iter()
                    .map(|s| s.content.to_string())
                    .collect::<String>();
                lines.push(self.format_line(text.trim_end().to_string(), max_line_len));
            }
        }

        self.wrap_lines_in_bubble(lines, max_line_len)
    }

    fn label(&self) -> String {
        match self.message.is_bot() {
            true => "Bot".to_string(),
            false => "You".to_string(),
        }
    }

    fn time(&self) -> String {
        self.message
            .created_at()
            .with_timezone(&chrono::Local)
            .format(TIME_FORMAT)
            .to_string()
    }

    fn wrap_lines_in_bubble(&self, lines: Vec<Line<'static>>, max_line_len: usize) -> Vec<Line<'static>> {
        let label = self.label();
        let top_bar = format!(
            "╭─ {} {}╮",
            label,
            "─".repeat(max_line_len.saturating_sub(label.width() + 1))
        );

        let time = self.time();
        let bottom_bar = format!(
            "╰─ {} {}╯",
            time,
            "─".repeat(max_line_len.saturating_sub(time.width() + 1))
        );
        let bar_padding =
            utils::repeat_from_subtractions(" ", vec![self.max_width, max_line_len, self.padding]);

        let (top, bottom) = if self.message.is_bot() {
            (
                format!("{top_bar}{bar_padding}"),
                format!("{bottom_bar}{bar_padding}"),
            )
        } else {
            (
                format!("{bar_padding}{top_bar}"),
                format!("{bar_padding}{bottom_bar}"),
            )
        };

        let mut res = vec![self.highlighted_line(top)];
        res.extend(lines);
        res.push(self.highlighted_line(bottom));
        res.push(Line::default());
        res
    }

    fn max_line_length(&self) -> usize {
        let min_outer_padding =
            (self.max_width as f32 * self.outer_padding_percentage).ceil() as usize;
        let line_border_width = self.border_elements_length + min_outer_padding;

        let mut max_line_len = self
            .message
            .text()
            .lines()
            .map(|line| line.width())
            .max()
            .unwrap_or_default()
            .min(self.max_width.saturating_sub(line_border_width));

        let width_percent = self.width_percent.clamp(10, 100) as f32 / 100.0;
        let max_allowed = (self.max_width as f32 * width_percent).ceil() as usize;
        max_line_len = max_line_len.min(max_allowed);

        // The bars carry the label and the time, both need to fit
        let label_len = self.label().width() + 2;
        let time_len = self.time().width() + 2;
        max_line_len.max(label_len).max(time_len)
    }

    fn format_line(&self, text: String, max_line_len: usize) -> Line<'static> {
        let fill = utils::repeat_from_subtractions(" ", vec![max_line_len, text.width()]);
        let formatted_line_len = max_line_len.max(text.width()) + self.padding;
        let outer_padding =
            utils::repeat_from_subtractions(" ", vec![self.max_width, formatted_line_len]);

        let mut bubble = vec![
            self.highlighted_span("│ ".to_string()),
            Span::raw(text),
            self.highlighted_span(format!("{fill} │")),
        ];

        if self.message.is_bot() {
            bubble.push(Span::raw(outer_padding));
            return Line::from(bubble);
        }

        let mut spans = vec![Span::raw(outer_padding)];
        spans.extend(bubble);
        Line::from(spans)
    }

    fn highlighted_span(&self, text: String) -> Span<'static> {
        let color = if self.message.is_bot() {
            Color::Rgb(255, 140, 105)
        } else {
            Color::Rgb(64, 224, 208)
        };
        Span::styled(text, Style::default().fg(color))
    }

    fn highlighted_line(&self, text: String) -> Line<'static> {
        Line::from(self.highlighted_span(text))
    }
}
