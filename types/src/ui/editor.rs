//! Line editor: buffer, history, multiline flag and suggestion overlay together.

use crate::NonEmptyString;

use super::continuation::needs_continuation;
use super::history::{HistoryStep, InputHistory, NavOutcome};
use super::line_buffer::LineBuffer;
use super::suggestions::SuggestionOverlay;

/// What Enter did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// Quotes or brackets are open; a newline was inserted.
    Continued,
    /// The trimmed line was recorded in history and the buffer reset.
    Submitted(NonEmptyString),
    /// Nothing but whitespace; the buffer was reset without a submission.
    Discarded,
}

#[derive(Debug, Default, Clone)]
pub struct LineEditor {
    buffer: LineBuffer,
    history: InputHistory,
    multiline: bool,
    suggestions: SuggestionOverlay,
}

impl LineEditor {
    #[must_use]
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionOverlay {
        &self.suggestions
    }

    pub fn suggestions_mut(&mut self) -> &mut SuggestionOverlay {
        &mut self.suggestions
    }

    /// Apply a buffer edit. The multiline flag drops once no newline is left.
    pub fn edit(&mut self, apply: impl FnOnce(&mut LineBuffer)) {
        apply(&mut self.buffer);
        if !self.buffer.text().contains('\n') {
            self.multiline = false;
        }
    }

    /// Unconditional newline (Alt+Enter).
    pub fn insert_newline(&mut self) {
        self.buffer.insert_char('\n');
        self.multiline = true;
    }

    pub fn enter(&mut self) -> EnterOutcome {
        if needs_continuation(self.buffer.text()) {
            self.insert_newline();
            return EnterOutcome::Continued;
        }
        self.submit()
    }

    /// Submit regardless of open quotes or brackets.
    pub fn submit(&mut self) -> EnterOutcome {
        let outcome = match NonEmptyString::trimmed(self.buffer.text()) {
            Ok(line) => {
                self.history.push(line.clone());
                EnterOutcome::Submitted(line)
            }
            Err(_) => EnterOutcome::Discarded,
        };
        self.reset();
        outcome
    }

    /// Returns false when history had nothing further in that direction.
    pub fn navigate_history(&mut self, step: HistoryStep) -> bool {
        match self.history.navigate(step, self.buffer.text()) {
            NavOutcome::Moved(text) => {
                self.multiline = text.contains('\n');
                self.buffer.set_text(text);
                true
            }
            NavOutcome::AtBoundary => false,
        }
    }

    /// Replace the buffer (an accepted suggestion, a whole typed line), cursor
    /// at the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.buffer.set_text(text);
        self.multiline = self.buffer.text().contains('\n');
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.history.reset_navigation();
        self.multiline = false;
        self.suggestions.hide();
    }
}
