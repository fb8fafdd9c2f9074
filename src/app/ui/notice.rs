use std::time::Duration;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};
use unicode_width::UnicodeWidthStr;

use crate::models::NoticeMessage;

use super::utils;

struct MessageWrapper {
    value: NoticeMessage,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Short-lived toasts stacked in the top right corner.
pub struct Notice {
    notices: Vec<MessageWrapper>,
    display_duration: Duration,
}

impl Notice {
    pub fn new(display_duration: Duration) -> Notice {
        Notice {
            display_duration,
            ..Default::default()
        }
    }

    pub fn add_message(&mut self, msg: NoticeMessage) {
        self.notices.push(MessageWrapper {
            value: msg,
            created_at: chrono::Utc::now(),
        });
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::info(msg))
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::warning(msg))
    }

    fn sync(&mut self) {
        let now = chrono::Utc::now();
        let default_duration = self.display_duration;
        self.notices.retain(|msg| {
            let elapsed = now.signed_duration_since(msg.created_at);
            elapsed.num_milliseconds()
                < msg.value.duration().unwrap_or(default_duration).as_millis() as i64
        });
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.sync();
        if self.notices.is_empty() || area.width < 6 || area.height < 3 {
            return;
        }

        let max_width = area.width as usize - 2;
        let max_height = area.height as usize;

        let items = build_list_items(&self.notices, max_width, max_height);
        f.render_widget(List::new(items), area);
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self {
            notices: vec![],
            display_duration: Duration::from_secs(3),
        }
    }
}

fn build_list_items<'a>(
    notices: &[MessageWrapper],
    max_width: usize,
    max_height: usize,
) -> Vec<ListItem<'a>> {
    let mut items = vec![];
    let mut current_height = 0;

    for item in notices {
        let kind = item.value.kind();
        let lines = build_bubble(
            item.value.message(),
            max_width,
            kind.border_color(),
            kind.text_color(),
        );

        current_height += lines.len();
        if current_height > max_height {
            break;
        }
        items.push(ListItem::new(lines));
    }
    items
}

fn build_bubble<'a>(
    message: &str,
    max_width: usize,
    border_color: Color,
    text_color: Color,
) -> Vec<Line<'a>> {
    let text_width = max_width.saturating_sub(2);
    let lines = utils::split_to_lines(message.replace('\n', " "), text_width);

    let border = Style::default().fg(border_color);
    let mut wrapped = vec![Line::from(Span::styled(
        format!("╭{}╮", "─".repeat(max_width)),
        border,
    ))];

    for line in lines {
        let text = line
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect::<String>()
            .trim_end()
            .to_string();
        let fill = utils::repeat_from_subtractions(" ", vec![text_width, text.width()]);
        wrapped.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(text, Style::default().fg(text_color)),
            Span::styled(format!("{fill} │"), border),
        ]));
    }

    wrapped.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(max_width)),
        border,
    )));
    wrapped
}
