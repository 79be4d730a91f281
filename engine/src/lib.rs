//! Session engine for weft.
//!
//! Owns the line editor, the render state and redraw scheduling. No terminal
//! IO happens here; the tui crate decodes bytes into [`Key`]s and draws
//! [`RenderState`] snapshots.

mod commands;
mod handler;
mod key;
mod render_state;
mod scheduler;
mod session;

pub use commands::{CommandRegistry, CommandSpec};
pub use handler::{SessionHandler, SuggestionSource};
pub use key::{Key, SpecialKey};
pub use render_state::{InputView, RenderState};
pub use scheduler::RedrawScheduler;
pub use session::{Redraw, Session, SessionOptions};

pub use weft_types::ui::{ConfirmationDialog, ProcessingStatus};
pub use weft_types::{ChatMessage, DiffPayload, MessageId, MessageMeta, Role};
