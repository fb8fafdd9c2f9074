pub mod action;
pub mod event;
pub mod message;
pub mod notice;
pub mod session;

pub use action::Action;
pub use event::{ArcEventTx, Event, EventTx};
pub use message::{ChatMessage, Role, Transcript};
pub use notice::*;
pub use session::{PendingFile, Session, is_pdf};
