use std::collections::BTreeMap;

use ratatui::{buffer::Buffer, layout::Rect, text::Line};

use crate::models::ChatMessage;

use super::bubble::Bubble;

struct CacheEntry {
    text_len: usize,
    lines: Vec<Line<'static>>,
}

/// Rendered lines of one transcript, cached per message index.
#[derive(Default)]
pub struct BubbleList {
    session_id: Option<String>,
    cache: BTreeMap<usize, CacheEntry>,
    lines: Vec<Line<'static>>,
    line_width: usize,
}

impl BubbleList {
    /// Rebuilds the line cache for `messages`. Only messages that are new or
    /// changed since the last call are rendered again, unless the session
    /// or the width changed.
    pub fn set_messages(
        &mut self,
        session_id: Option<&str>,
        messages: &[ChatMessage],
        line_width: usize,
    ) {
        if self.line_width != line_width || self.session_id.as_deref() != session_id {
            self.cache.clear();
            self.line_width = line_width;
            self.session_id = session_id.map(str::to_string);
        }

        self.cache.retain(|i, _| *i < messages.len());
        for (i, message) in messages.iter().enumerate() {
            if let Some(entry) = self.cache.get(&i) {
                if entry.text_len == message.text().len() {
                    continue;
                }
            }

            self.cache.insert(
                i,
                CacheEntry {
                    text_len: message.text().len(),
                    lines: Bubble::new(message, line_width).as_lines(),
                },
            );
        }

        self.lines = self
            .cache
            .values()
            .flat_map(|entry| entry.lines.iter().cloned())
            .collect();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self, rect: Rect, buf: &mut Buffer, scroll_index: usize) {
        for (i, line) in self
            .lines
            .iter()
            .skip(scroll_index)
            .take(rect.height as usize)
            .enumerate()
        {
            buf.set_line(rect.x, rect.y + i as u16, line, rect.width);
        }
    }
}
