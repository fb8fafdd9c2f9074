#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use crate::backend::{ArcService, UploadFile};
use crate::config::constants::NO_RESPONSE;
use crate::models::{ArcEventTx, ChatMessage, Event, PendingFile, Session};

use super::{
    ControllerError, ControllerState, ENDPOINT_NOT_CONFIGURED, NO_ACTIVE_SESSION,
    NO_FILES_SELECTED, NO_SESSION_TO_DELETE, Transition, UNKNOWN_SESSION,
};

/// Owns the page state and runs the upload, ask and delete flows against
/// the document service.
///
/// Every state change goes through [`ControllerState::reduce`]; when an
/// event sender is attached, a snapshot is published after each one so the
/// page can render intermediate states (busy, optimistic user message)
/// while a request is in flight.
pub struct SessionController {
    service: ArcService,
    state: ControllerState,
    event_tx: Option<ArcEventTx>,
}

impl SessionController {
    pub fn new(service: ArcService) -> Self {
        Self {
            service,
            state: ControllerState::default(),
            event_tx: None,
        }
    }

    pub fn with_event_tx(mut self, event_tx: ArcEventTx) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn with_state(mut self, state: ControllerState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub async fn select_files(&mut self, files: Vec<PendingFile>) {
        self.commit(Transition::SelectFiles(files)).await;
    }

    pub async fn update_draft(&mut self, text: impl Into<String>) {
        self.commit(Transition::SetDraft(text.into())).await;
    }

    pub async fn select_session(&mut self, session_id: &str) -> Result<(), ControllerError> {
        if self.state.session(session_id).is_none() {
            return Err(ControllerError::validation(UNKNOWN_SESSION));
        }
        self.commit(Transition::SelectSession(session_id.to_string()))
            .await;
        Ok(())
    }

    /// Uploads the currently selected files.
    pub async fn upload_pending(&mut self) -> Result<Vec<Session>, ControllerError> {
        let files = self.state.pending_files().to_vec();
        self.submit_upload(files).await
    }

    /// Uploads `files` one after another.
    ///
    /// The batch stops at the first failure. Sessions created before the
    /// failing file stay applied; pending files are only cleared when the
    /// whole batch succeeds.
    pub async fn submit_upload(
        &mut self,
        files: Vec<PendingFile>,
    ) -> Result<Vec<Session>, ControllerError> {
        if files.is_empty() {
            return Err(ControllerError::validation(NO_FILES_SELECTED));
        }
        self.ensure_configured()?;

        self.commit(Transition::SetBusy(true)).await;

        let mut uploaded = vec![];
        let result = self.upload_each(&files, &mut uploaded).await;

        if !uploaded.is_empty() {
            self.commit(Transition::SessionsUploaded(uploaded.clone()))
                .await;
        }
        if result.is_ok() {
            self.commit(Transition::ClearPendingFiles).await;
        }
        self.commit(Transition::SetBusy(false)).await;

        match result {
            Ok(()) => Ok(uploaded),
            Err(err) => {
                log::error!(
                    "Upload stopped after {} of {} files: {}",
                    uploaded.len(),
                    files.len(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Asks the active session a question.
    ///
    /// Returns `Ok(None)` without doing anything for blank input. The user
    /// message is appended before the request and is kept when it fails.
    pub async fn submit_question(
        &mut self,
        text: &str,
    ) -> Result<Option<ChatMessage>, ControllerError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let Some(session_id) = self.state.active_session_id().map(str::to_string) else {
            return Err(ControllerError::validation(NO_ACTIVE_SESSION));
        };
        self.ensure_configured()?;

        self.commit(Transition::SetBusy(true)).await;
        self.commit(Transition::AppendMessage {
            session_id: session_id.clone(),
            message: ChatMessage::user(text),
        })
        .await;

        let result = match self.service.ask(&session_id, text).await {
            Ok(resp) => {
                let answer = resp
                    .answer
                    .filter(|answer| !answer.is_empty())
                    .unwrap_or_else(|| NO_RESPONSE.to_string());
                let message = ChatMessage::bot(answer);
                self.commit(Transition::AppendMessage {
                    session_id,
                    message: message.clone(),
                })
                .await;
                self.commit(Transition::ClearDraft).await;
                Ok(Some(message))
            }
            Err(err) => {
                log::error!("Ask on session {} failed: {}", session_id, err);
                Err(err.into())
            }
        };

        self.commit(Transition::SetBusy(false)).await;
        result
    }

    /// Deletes a session remotely, then locally. State is untouched when the
    /// service refuses.
    pub async fn request_delete(&mut self, session_id: Option<&str>) -> Result<(), ControllerError> {
        let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
            return Err(ControllerError::validation(NO_SESSION_TO_DELETE));
        };
        self.ensure_configured()?;

        self.commit(Transition::SetBusy(true)).await;
        let result = self.service.delete(session_id).await;

        if let Err(err) = &result {
            log::error!("Delete of session {} failed: {}", session_id, err);
        } else {
            log::info!("Deleted session {}", session_id);
            self.commit(Transition::SessionDeleted(session_id.to_string()))
                .await;
        }
        self.commit(Transition::SetBusy(false)).await;

        Ok(result?)
    }

    async fn upload_each(
        &self,
        files: &[PendingFile],
        uploaded: &mut Vec<Session>,
    ) -> Result<(), ControllerError> {
        for file in files {
            let content =
                tokio::fs::read(file.path())
                    .await
                    .map_err(|source| ControllerError::ReadFile {
                        name: file.name().to_string(),
                        source,
                    })?;

            let resp = self
                .service
                .upload(UploadFile {
                    name: file.name().to_string(),
                    content,
                })
                .await?;

            let name = resp
                .filename
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| file.name().to_string());
            log::info!("Uploaded {} as session {}", name, resp.session_id);
            uploaded.push(Session::new(resp.session_id, name));
        }
        Ok(())
    }

    fn ensure_configured(&self) -> Result<(), ControllerError> {
        if !self.service.is_configured() {
            return Err(ControllerError::validation(ENDPOINT_NOT_CONFIGURED));
        }
        Ok(())
    }

    async fn commit(&mut self, transition: Transition) {
        log::trace!("Applying {:?}", transition);
        self.state = std::mem::take(&mut self.state).reduce(transition);

        if let Some(event_tx) = &self.event_tx {
            if let Err(err) = event_tx
                .send(Event::StateChanged(Box::new(self.state.clone())))
                .await
            {
                log::debug!("Failed to publish state: {}", err);
            }
        }
    }
}
