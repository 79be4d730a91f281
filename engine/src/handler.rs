//! Seams to the host application.

use crate::key::SpecialKey;
use crate::session::Session;

/// Receives what the session cannot decide on its own.
///
/// Both callbacks get the session back so the host can react through the
/// mutator surface (append a reply, open a dialog, clear the transcript).
pub trait SessionHandler {
    /// A trimmed, non-empty submission, or the label of the option chosen in
    /// a confirmation dialog.
    fn on_completed_line(&mut self, session: &mut Session, line: &str);

    fn on_special_key(&mut self, session: &mut Session, key: SpecialKey);
}

/// Candidate lookup for the suggestion overlay.
pub trait SuggestionSource {
    fn suggestions(&self, input: &str) -> Vec<String>;
}
