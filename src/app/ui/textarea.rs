#[cfg(test)]
#[path = "textarea_test.rs"]
mod tests;

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Padding},
};

/// Builder for the question input box.
pub struct TextArea {
    title: String,
    placeholder: String,
    focused: bool,
}

impl TextArea {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn build<'a>(&self) -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        self.apply(&mut textarea);
        textarea
    }

    /// Replaces `textarea` with an empty one when it still holds `text`.
    /// Anything typed since `text` was submitted is kept.
    pub fn clear_if_holds<'a>(
        &self,
        textarea: &mut tui_textarea::TextArea<'a>,
        text: &str,
    ) -> bool {
        if textarea.lines().join("\n") != text {
            return false;
        }
        *textarea = self.build();
        true
    }

    /// Restyles an existing text area without touching its content.
    pub fn apply(&self, textarea: &mut tui_textarea::TextArea<'_>) {
        let border = if self.focused {
            Color::LightBlue
        } else {
            Color::DarkGray
        };
        textarea.set_block(
            Block::default()
                .title(self.title.clone())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border))
                .title_alignment(Alignment::Left)
                .padding(Padding::new(1, 1, 0, 0)),
        );
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text(self.placeholder.clone());
    }
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            title: " Question ".to_string(),
            placeholder: "Ask something about the selected document...".to_string(),
            focused: true,
        }
    }
}
