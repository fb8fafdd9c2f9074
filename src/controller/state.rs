#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

use std::collections::HashMap;

use crate::models::{ChatMessage, PendingFile, Session, Transcript};

/// Everything the page shows, owned by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    pending_files: Vec<PendingFile>,
    sessions: Vec<Session>,
    active_session_id: Option<String>,
    draft_question: String,
    transcripts: HashMap<String, Transcript>,
    busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    SelectFiles(Vec<PendingFile>),
    ClearPendingFiles,
    SetDraft(String),
    ClearDraft,
    SelectSession(String),
    SetBusy(bool),

    /// Prepends a block of freshly uploaded sessions in submission order and
    /// activates the first of them.
    SessionsUploaded(Vec<Session>),

    AppendMessage {
        session_id: String,
        message: ChatMessage,
    },

    /// Drops a session and its transcript, reassigning the active session
    /// when the dropped one was active.
    SessionDeleted(String),
}

impl ControllerState {
    pub fn reduce(mut self, transition: Transition) -> Self {
        match transition {
            Transition::SelectFiles(files) => self.pending_files = files,
            Transition::ClearPendingFiles => self.pending_files.clear(),
            Transition::SetDraft(text) => self.draft_question = text,
            Transition::ClearDraft => self.draft_question.clear(),
            Transition::SetBusy(busy) => self.busy = busy,

            Transition::SelectSession(id) => {
                if self.session(&id).is_some() {
                    self.active_session_id = Some(id);
                }
            }

            Transition::SessionsUploaded(uploaded) => {
                let Some(first) = uploaded.first() else {
                    return self;
                };
                self.active_session_id = Some(first.id().to_string());

                for session in &uploaded {
                    self.transcripts
                        .entry(session.id().to_string())
                        .or_default();
                }
                // Session ids are unique, a re-issued id replaces the old entry
                let previous = std::mem::take(&mut self.sessions)
                    .into_iter()
                    .filter(|s| !uploaded.iter().any(|n| n.id() == s.id()))
                    .collect::<Vec<_>>();
                self.sessions = uploaded;
                self.sessions.extend(previous);
            }

            Transition::AppendMessage {
                session_id,
                message,
            } => {
                if self.session(&session_id).is_some() {
                    self.transcripts
                        .entry(session_id)
                        .or_default()
                        .push(message);
                }
            }

            Transition::SessionDeleted(id) => {
                let Some(pos) = self.sessions.iter().position(|s| s.id() == id) else {
                    return self;
                };

                if self.active_session_id.as_deref() == Some(id.as_str()) {
                    self.active_session_id = self
                        .sessions
                        .iter()
                        .find(|s| s.id() != id)
                        .map(|s| s.id().to_string());
                }
                self.sessions.remove(pos);
                self.transcripts.remove(&id);
            }
        }
        self
    }

    pub fn pending_files(&self) -> &[PendingFile] {
        &self.pending_files
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active_session_id().and_then(|id| self.session(id))
    }

    pub fn draft_question(&self) -> &str {
        &self.draft_question
    }

    pub fn transcripts(&self) -> &HashMap<String, Transcript> {
        &self.transcripts
    }

    pub fn transcript(&self, session_id: &str) -> &[ChatMessage] {
        self.transcripts
            .get(session_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Messages of the active session, empty when none is selected.
    pub fn active_transcript(&self) -> &[ChatMessage] {
        match self.active_session_id() {
            Some(id) => self.transcript(id),
            None => &[],
        }
    }

    pub fn busy(&self) -> bool {
        self.busy
    }
}
