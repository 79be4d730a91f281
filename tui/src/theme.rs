//! Glyphs for the fixed layout.
//!
//! Unicode by default; ASCII-only when `[ui] ascii_only` is set or
//! `WEFT_ASCII` is truthy.

use std::time::Duration;

use weft_types::Role;
use weft_types::ui::{ProcessingStatus, UiOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub user: &'static str,
    pub assistant: &'static str,
    pub tool: &'static str,
    pub system: &'static str,
    pub rule: &'static str,
    pub separator: &'static str,
    pub prompt: &'static str,
    pub continuation: &'static str,
    pub selected: &'static str,
    pub unselected: &'static str,
    pub status_ready: &'static str,
    pub status_error: &'static str,
    pub diff_gutter: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

/// Spinner advances once per this much elapsed time.
const SPINNER_STEP: Duration = Duration::from_millis(100);

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            user: ">",
            assistant: "<",
            tool: "T",
            system: "*",
            rule: "-",
            separator: " | ",
            prompt: "> ",
            continuation: "  ",
            selected: "> ",
            unselected: "  ",
            status_ready: "*",
            status_error: "!",
            diff_gutter: "| ",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            user: "○",
            assistant: "◇",
            tool: "⊙",
            system: "●",
            rule: "─",
            separator: " · ",
            prompt: "> ",
            continuation: "  ",
            selected: "▸ ",
            unselected: "  ",
            status_ready: "●",
            status_error: "✗",
            diff_gutter: "│ ",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

impl Glyphs {
    #[must_use]
    pub fn role(&self, role: Role) -> &'static str {
        match role {
            Role::User => self.user,
            Role::Assistant => self.assistant,
            Role::Tool => self.tool,
            Role::System => self.system,
        }
    }

    /// Status marker. Busy states pick a spinner frame from the elapsed time,
    /// so the same state always renders the same glyph.
    #[must_use]
    pub fn status(&self, status: ProcessingStatus, elapsed: Option<Duration>) -> &'static str {
        match status {
            ProcessingStatus::Idle => self.status_ready,
            ProcessingStatus::Error => self.status_error,
            ProcessingStatus::Processing | ProcessingStatus::Thinking | ProcessingStatus::Waiting => {
                let tick = elapsed.map_or(0, |e| e.as_millis() / SPINNER_STEP.as_millis()) as usize;
                self.spinner_frames[tick % self.spinner_frames.len()]
            }
        }
    }
}
