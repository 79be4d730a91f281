//! UI state types for the session engine.
//!
//! Pure data types with no IO and no async. Owned by the engine, read by the
//! tui layer when composing frames.

mod continuation;
mod dialog;
mod editor;
mod history;
mod line_buffer;
mod status;
mod suggestions;

pub use continuation::needs_continuation;
pub use dialog::ConfirmationDialog;
pub use editor::{EnterOutcome, LineEditor};
pub use history::{HISTORY_CAPACITY, HistoryStep, InputHistory, NavOutcome};
pub use line_buffer::LineBuffer;
pub use status::{Activity, ProcessingStatus, UiOptions};
pub use suggestions::SuggestionOverlay;
