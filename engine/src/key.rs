//! Symbolic keys produced by the byte decoder.

/// A decoded key, already named by the editing action it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    /// Alt+Enter: newline regardless of the continuation heuristic.
    Newline,
    Tab,
    /// Shift+Tab.
    BackTab,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    DeleteWordBackward,
    KillToLineEnd,
    KillToLineStart,
    HistoryPrev,
    HistoryNext,
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+L.
    Redraw,
}

/// Keys reported to the host instead of editing the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Interrupt,
    Redraw,
    /// Escape with nothing left to dismiss, or Escape on a dialog.
    Cancel,
    /// Shift+Tab; the session flips auto-edit before reporting it.
    Toggle,
}

impl SpecialKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interrupt => "interrupt",
            Self::Redraw => "redraw",
            Self::Cancel => "cancel",
            Self::Toggle => "toggle",
        }
    }
}
