#[cfg(test)]
#[path = "picker_test.rs"]
mod tests;

use std::{
    io,
    path::{Path, PathBuf},
};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding},
};
use ratatui_macros::span;
use tokio::sync::mpsc;
use tui_textarea::Key;

use crate::models::{Event, PendingFile, is_pdf};

use super::Dim;

const PARENT_DIR: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    Dir,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

impl Entry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }
}

/// Lists `dir` for the picker: the parent entry first, then sub directories,
/// then PDF files. Hidden entries are skipped.
pub fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut dirs = vec![];
    let mut files = vec![];

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            dirs.push(Entry {
                path,
                name,
                kind: EntryKind::Dir,
            });
        } else if is_pdf(&path) {
            files.push(Entry {
                path,
                name,
                kind: EntryKind::File,
            });
        }
    }

    dirs.sort_by_key(|e| e.name.to_lowercase());
    files.sort_by_key(|e| e.name.to_lowercase());

    let mut entries = vec![];
    if let Some(parent) = dir.parent() {
        entries.push(Entry {
            path: parent.to_path_buf(),
            name: PARENT_DIR.to_string(),
            kind: EntryKind::Parent,
        });
    }
    entries.extend(dirs);
    entries.extend(files);
    Ok(entries)
}

/// Popup for choosing PDF files. Confirmed selections are sent back as
/// [`Event::FilesPicked`] in the order they were marked.
pub struct FilePicker {
    showing: bool,
    event_tx: mpsc::UnboundedSender<Event>,

    dir: PathBuf,
    entries: Vec<Entry>,
    marked: Vec<PathBuf>,
    error: Option<String>,
    list_state: ListState,
}

impl FilePicker {
    pub fn new(event_tx: mpsc::UnboundedSender<Event>, dir: impl Into<PathBuf>) -> Self {
        Self {
            showing: false,
            event_tx,
            dir: dir.into(),
            entries: vec![],
            marked: vec![],
            error: None,
            list_state: ListState::default(),
        }
    }

    pub fn showing(&self) -> bool {
        self.showing
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn marked(&self) -> &[PathBuf] {
        &self.marked
    }

    pub fn open(&mut self) {
        self.showing = true;
        self.marked.clear();
        let dir = self.dir.clone();
        self.change_dir(dir);
    }

    pub fn close(&mut self) {
        self.showing = false;
    }

    fn change_dir(&mut self, dir: PathBuf) {
        let dir = dir.canonicalize().unwrap_or(dir);
        match read_entries(&dir) {
            Ok(entries) => {
                self.dir = dir;
                self.entries = entries;
                self.error = None;
                // Land on the first real entry rather than ".."
                let first = self
                    .entries
                    .iter()
                    .position(|e| e.kind != EntryKind::Parent)
                    .or(if self.entries.is_empty() { None } else { Some(0) });
                self.list_state.select(first);
            }
            Err(err) => {
                log::warn!("Failed to read directory {}: {}", dir.display(), err);
                self.error = Some(format!("Cannot open {}: {}", dir.display(), err));
            }
        }
    }

    fn selected(&self) -> Option<&Entry> {
        self.list_state.selected().and_then(|i| self.entries.get(i))
    }

    fn next_row(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.entries.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn prev_row(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = self.list_state.selected().unwrap_or_default().saturating_sub(1);
        self.list_state.select(Some(i));
    }

    fn toggle_mark(&mut self) {
        let Some(entry) = self.selected() else {
            return;
        };
        if entry.kind != EntryKind::File {
            return;
        }

        let path = entry.path.clone();
        match self.marked.iter().position(|p| *p == path) {
            Some(pos) => {
                self.marked.remove(pos);
            }
            None => self.marked.push(path),
        }
        self.next_row();
    }

    fn go_up(&mut self) {
        if let Some(parent) = self.dir.parent() {
            let parent = parent.to_path_buf();
            self.change_dir(parent);
        }
    }

    fn on_enter(&mut self) {
        let Some(entry) = self.selected().cloned() else {
            return;
        };

        match entry.kind {
            EntryKind::Parent | EntryKind::Dir => self.change_dir(entry.path),
            EntryKind::File => {
                let paths = if self.marked.is_empty() {
                    vec![entry.path]
                } else {
                    std::mem::take(&mut self.marked)
                };
                self.confirm(paths);
            }
        }
    }

    fn confirm(&mut self, paths: Vec<PathBuf>) {
        let files = paths.into_iter().map(PendingFile::new).collect();
        self.event_tx.send(Event::FilesPicked(files)).ok();
        self.showing = false;
    }

    pub fn handle_key_event(&mut self, event: &Event) {
        match event {
            Event::KeyboardEsc | Event::KeyboardCtrlO => self.close(),
            Event::KeyboardEnter => self.on_enter(),
            Event::UiScrollUp => self.prev_row(),
            Event::UiScrollDown => self.next_row(),

            Event::KeyboardCharInput(input) => match input.key {
                Key::Char('j') | Key::Down => self.next_row(),
                Key::Char('k') | Key::Up => self.prev_row(),
                Key::Char(' ') => self.toggle_mark(),
                Key::Backspace | Key::Char('h') => self.go_up(),
                Key::Char('q') => self.close(),
                _ => {}
            },

            _ => {}
        }
    }

    fn build_list_items(&self) -> Vec<ListItem<'static>> {
        self.entries
            .iter()
            .map(|entry| {
                let line = match entry.kind {
                    EntryKind::Parent => Line::from(Span::styled(
                        format!("    {}", entry.name),
                        Style::default().fg(Color::Gray),
                    )),
                    EntryKind::Dir => Line::from(Span::styled(
                        format!("    {}/", entry.name),
                        Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
                    )),
                    EntryKind::File => {
                        let mark = if self.marked.contains(&entry.path) {
                            Span::styled("[x] ", Style::default().fg(Color::LightGreen))
                        } else {
                            Span::raw("[ ] ")
                        };
                        Line::from(vec![mark, Span::raw(entry.name.clone())])
                    }
                };
                ListItem::new(line)
            })
            .collect()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        if !self.showing {
            return;
        }

        let instructions: Vec<Span> = vec![
            " ".into(),
            span!("Space").green().bold(),
            span!(" mark, ").white(),
            span!("Enter").green().bold(),
            span!(" open/confirm, ").white(),
            span!("Backspace").green().bold(),
            span!(" up, ").white(),
            span!("Esc").green().bold(),
            span!(" close ").white(),
        ];

        let mut title = Line::from(format!(" {} ", self.dir.display())).bold();
        if !self.marked.is_empty() {
            title.push_span(span!(format!("({} marked) ", self.marked.len())).light_green());
        }
        if let Some(error) = &self.error {
            title = Line::from(format!(" {} ", error)).light_red().bold();
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::new(1, 1, 0, 0))
            .title(title)
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(instructions));

        f.dim_bg();
        f.render_widget(Clear, area);

        let list = List::new(self.build_list_items())
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}
