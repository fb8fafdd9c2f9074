use std::sync::Arc;

use tokio::sync::mpsc;
use tui_textarea::Input;

use crate::controller::ControllerState;

#[derive(Debug)]
pub enum Event {
    Notice(crate::models::NoticeMessage),
    Alert(crate::models::NoticeMessage),

    StateChanged(Box<ControllerState>),
    /// Carries the question text that was answered.
    QuestionAnswered(String),
    FilesPicked(Vec<crate::models::PendingFile>),

    KeyboardCharInput(Input),
    KeyboardEsc,
    KeyboardEnter,
    KeyboardNewLine,
    KeyboardTab,
    KeyboardCtrlC,
    KeyboardCtrlO,
    KeyboardCtrlU,
    KeyboardF1,
    KeyboardPaste(String),

    Quit,

    UiTick,
    UiScrollUp,
    UiScrollDown,
    UiScrollPageUp,
    UiScrollPageDown,
}

#[macro_export]
macro_rules! notice_warning {
    ($msg:expr) => {
        Event::Notice($crate::models::NoticeMessage::warning($msg))
    };
    ($msg:expr, $duration:expr) => {
        Event::Notice($crate::models::NoticeMessage::warning($msg).with_duration($duration))
    };
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
