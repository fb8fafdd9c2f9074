pub mod alert;
pub mod bubble;
pub mod bubble_list;
pub mod help;
pub mod loading;
pub mod notice;
pub mod picker;
pub mod question;
pub mod scroll;
pub mod sessions;
pub mod textarea;
pub mod utils;

pub use alert::Alert;
pub use bubble::Bubble;
pub use bubble_list::BubbleList;
pub use help::HelpScreen;
pub use loading::Loading;
pub use notice::Notice;
pub use picker::FilePicker;
pub use question::Question;
pub use scroll::Scroll;
pub use sessions::SessionsPanel;
pub use textarea::TextArea;

use ratatui::{
    style::{Color, Modifier, Style},
    widgets::Block,
};

pub trait Dim {
    fn dim_bg(&mut self);
}

impl Dim for ratatui::Frame<'_> {
    fn dim_bg(&mut self) {
        self.render_widget(
            Block::default().style(
                Style::default()
                    .bg(Color::Rgb(0, 0, 0))
                    .add_modifier(Modifier::DIM),
            ),
            self.area(),
        );
    }
}
