use super::PendingFile;

/// Requests from the terminal page to the controller owner.
#[derive(Debug)]
pub enum Action {
    SelectFiles(Vec<PendingFile>),
    UploadPending,
    SubmitQuestion(String),
    SelectSession(String),
    DeleteSession(String),
}
