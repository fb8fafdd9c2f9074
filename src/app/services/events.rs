#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use crossterm::event::{Event as CrosstermEvent, EventStream, MouseEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::{Input, Key};

use crate::{config::constants::FRAME_DURATION, models::Event};

/// Merges terminal input, internal events and the UI tick into one stream.
pub struct EventService {
    crossterm_events: EventStream,
    event_rx: mpsc::UnboundedReceiver<Event>,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl EventService {
    pub fn event_tx(&self) -> mpsc::UnboundedSender<Event> {
        self.event_tx.clone()
    }

    pub async fn next(&mut self) -> Event {
        loop {
            let e = tokio::select! {
                event = self.event_rx.recv() => event,
                event = self.crossterm_events.next().fuse() => match event {
                    Some(Ok(input)) => map_crossterm(input),
                    Some(Err(err)) => {
                        log::warn!("Failed to read terminal event: {}", err);
                        None
                    }
                    None => None,
                },
                _ = time::sleep(FRAME_DURATION) => Some(Event::UiTick),
            };

            if let Some(event) = e {
                return event;
            }
        }
    }
}

impl Default for EventService {
    fn default() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        Self {
            crossterm_events: EventStream::new(),
            event_rx,
            event_tx,
        }
    }
}

pub(crate) fn map_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(Event::UiScrollUp),
            MouseEventKind::ScrollDown => Some(Event::UiScrollDown),
            _ => None,
        },
        CrosstermEvent::Key(key_event) => {
            if key_event.kind == crossterm::event::KeyEventKind::Release {
                return None;
            }
            map_input(key_event.into())
        }
        _ => None,
    }
}

pub(crate) fn map_input(input: Input) -> Option<Event> {
    if input.key == Key::Enter && (input.shift || input.alt) {
        return Some(Event::KeyboardNewLine);
    }

    if input.ctrl {
        return match input.key {
            Key::Char('q') => Some(Event::Quit),
            Key::Char('c') => Some(Event::KeyboardCtrlC),
            Key::Char('o') => Some(Event::KeyboardCtrlO),
            Key::Char('u') => Some(Event::KeyboardCtrlU),
            Key::Up => Some(Event::UiScrollPageUp),
            Key::Down => Some(Event::UiScrollPageDown),
            _ => None,
        };
    }

    match input.key {
        Key::Esc => Some(Event::KeyboardEsc),
        Key::F(1) => Some(Event::KeyboardF1),
        Key::Enter => Some(Event::KeyboardEnter),
        Key::Tab => Some(Event::KeyboardTab),
        Key::Up => Some(Event::UiScrollUp),
        Key::Down => Some(Event::UiScrollDown),
        Key::MouseScrollUp => Some(Event::UiScrollUp),
        Key::MouseScrollDown => Some(Event::UiScrollDown),
        Key::PageUp => Some(Event::UiScrollPageUp),
        Key::PageDown => Some(Event::UiScrollPageDown),
        _ => Some(Event::KeyboardCharInput(input)),
    }
}
