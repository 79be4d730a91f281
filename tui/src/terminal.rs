//! Raw-mode terminal ownership.

use std::io::{self, IsTerminal, Stdout, Write, stdout};

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

/// RAII guard for raw mode and the alternate screen.
///
/// Canonical mode is restored by [`TerminalSession::release`] or on drop,
/// including during unwinding.
#[derive(Debug)]
pub struct TerminalSession {
    out: Stdout,
    active: bool,
}

impl TerminalSession {
    /// Fails when stdin or stdout is not a TTY, or raw mode is refused.
    pub fn enter() -> io::Result<Self> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            return Err(io::Error::other("stdin/stdout is not a terminal"));
        }
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        tracing::info!("terminal session started");
        Ok(Self { out, active: true })
    }

    /// Current (columns, rows).
    pub fn size() -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    pub fn writer(&mut self) -> &mut impl Write {
        &mut self.out
    }

    /// Leave the alternate screen and raw mode. Safe to call more than once.
    pub fn release(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = execute!(self.out, Show, LeaveAlternateScreen);
        disable_raw_mode()?;
        tracing::info!("terminal session released");
        screen
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
