//! Line-buffered fallback when no TTY is available.

use std::io::{self, Write};

use weft_engine::{ChatMessage, MessageId, ProcessingStatus, RenderState};
use weft_types::sanitize_display_text;

/// Prints what changed in the render state as plain lines: new messages,
/// status changes, and a dialog when it first appears.
#[derive(Debug, Default)]
pub struct PlainPrinter {
    last_id: Option<MessageId>,
    last_status: Option<ProcessingStatus>,
    dialog_shown: bool,
}

impl PlainPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print<W: Write>(&mut self, out: &mut W, state: &RenderState) -> io::Result<()> {
        let last_id = self.last_id;
        for message in state
            .messages()
            .iter()
            .filter(|m| last_id.is_none_or(|last| m.id() > last))
        {
            write_message(out, message)?;
            self.last_id = Some(message.id());
        }

        let status = state.status();
        let changed = self.last_status.is_some_and(|last| last != status);
        if changed || (self.last_status.is_none() && status != ProcessingStatus::Idle) {
            writeln!(out, "[{}]", status.label())?;
        }
        self.last_status = Some(status);

        match state.dialog() {
            Some(dialog) if !self.dialog_shown => {
                writeln!(out, "{}", sanitize_display_text(dialog.title()))?;
                writeln!(out, "{}", sanitize_display_text(dialog.message()))?;
                for (i, option) in dialog.options().iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, sanitize_display_text(option))?;
                }
                self.dialog_shown = true;
            }
            Some(_) => {}
            None => self.dialog_shown = false,
        }
        out.flush()
    }
}

fn write_message<W: Write>(out: &mut W, message: &ChatMessage) -> io::Result<()> {
    let label = message.tool_name().unwrap_or(message.role().as_str());
    writeln!(
        out,
        "{}: {}",
        sanitize_display_text(label),
        sanitize_display_text(message.content())
    )?;
    if let Some(diff) = message.diff() {
        for line in sanitize_display_text(diff.as_str()).lines() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

/// Splits a byte stream into lines, tolerating CRLF and invalid UTF-8.
#[derive(Debug, Default)]
pub struct LineAssembler {
    partial: Vec<u8>,
}

impl LineAssembler {
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in bytes {
            if byte == b'\n' {
                lines.push(decode_line(&std::mem::take(&mut self.partial)));
            } else {
                self.partial.push(byte);
            }
        }
        lines
    }

    /// The unterminated tail at end of input, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            None
        } else {
            Some(decode_line(&std::mem::take(&mut self.partial)))
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\r')
        .to_owned()
}
