#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use eyre::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::controller::{ControllerError, SessionController};
use crate::models::{Action, ArcEventTx, Event, NoticeMessage, PendingFile, Session};

/// Runs user actions against the controller, one at a time, and reports the
/// outcome back to the page as events.
pub struct ActionService {
    controller: SessionController,
    action_rx: mpsc::UnboundedReceiver<Action>,
    event_tx: ArcEventTx,
    cancel_token: CancellationToken,
}

impl ActionService {
    pub fn new(
        controller: SessionController,
        action_rx: mpsc::UnboundedReceiver<Action>,
        event_tx: ArcEventTx,
        cancel_token: CancellationToken,
    ) -> ActionService {
        ActionService {
            controller,
            action_rx,
            event_tx,
            cancel_token,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Action service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let Some(action) = action else {
                        log::debug!("Action channel closed");
                        return Ok(());
                    };
                    self.handle(action).await?;
                }
            }
        }
    }

    pub async fn handle(&mut self, action: Action) -> Result<()> {
        log::debug!("Handling action: {:?}", action);
        match action {
            Action::SelectFiles(files) => self.on_select_files(files).await?,

            Action::UploadPending => match self.controller.upload_pending().await {
                Ok(sessions) => {
                    self.alert(NoticeMessage::info(upload_summary(&sessions)))
                        .await?
                }
                Err(err) => self.alert_error(err).await?,
            },

            Action::SubmitQuestion(text) => {
                self.controller.update_draft(text.as_str()).await;
                let result = self.controller.submit_question(&text).await;
                match result {
                    Ok(Some(_)) => self.event_tx.send(Event::QuestionAnswered(text)).await?,
                    Ok(None) => {}
                    Err(err) => self.alert_error(err).await?,
                }
            }

            Action::SelectSession(id) => match self.controller.select_session(&id).await {
                Ok(()) => {
                    let name = self.session_name(&id);
                    self.notice(NoticeMessage::info(format!("Switched to \"{}\"", name)))
                        .await?;
                }
                Err(err) => self.alert_error(err).await?,
            },

            Action::DeleteSession(id) => {
                let name = self.session_name(&id);
                match self.controller.request_delete(Some(&id)).await {
                    Ok(()) => {
                        self.notice(NoticeMessage::info(format!("Deleted \"{}\"", name)))
                            .await?
                    }
                    Err(err) => self.alert_error(err).await?,
                }
            }
        }
        Ok(())
    }

    async fn on_select_files(&mut self, files: Vec<PendingFile>) -> Result<()> {
        let count = files.len();
        self.controller.select_files(files).await;
        if count > 0 {
            self.notice(NoticeMessage::info(format!(
                "{} file(s) selected, press Ctrl+U to upload",
                count
            )))
            .await?;
        }
        Ok(())
    }

    fn session_name(&self, id: &str) -> String {
        self.controller
            .state()
            .session(id)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    async fn notice(&self, message: NoticeMessage) -> Result<()> {
        self.event_tx.send(Event::Notice(message)).await?;
        Ok(())
    }

    async fn alert(&self, message: NoticeMessage) -> Result<()> {
        self.event_tx.send(Event::Alert(message)).await?;
        Ok(())
    }

    async fn alert_error(&self, err: ControllerError) -> Result<()> {
        log::warn!("Action failed ({:?}): {}", err.kind(), err);
        self.alert(NoticeMessage::error(err.to_string())).await
    }
}

fn upload_summary(sessions: &[Session]) -> String {
    match sessions {
        [session] => format!("\"{}\" uploaded successfully.", session.name()),
        _ => format!("{} documents uploaded successfully.", sessions.len()),
    }
}
