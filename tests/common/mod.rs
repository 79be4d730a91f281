//! Shared test harness: a session wired to a virtual terminal.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use weft_engine::{Session, SessionHandler, SessionOptions, SpecialKey};
use weft_tui::{DiffRenderer, KeyDecoder, LayoutConfig, compose};
use weft_types::ui::UiOptions;

/// Far enough past any debounce window used in the suite.
const SETTLE: Duration = Duration::from_secs(5);

/// Records everything the session reports to its host.
#[derive(Debug, Default)]
pub struct Recorder {
    pub lines: Vec<String>,
    pub specials: Vec<SpecialKey>,
}

impl SessionHandler for Recorder {
    fn on_completed_line(&mut self, _session: &mut Session, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn on_special_key(&mut self, _session: &mut Session, key: SpecialKey) {
        self.specials.push(key);
    }
}

pub struct Harness {
    pub session: Session,
    pub handler: Recorder,
    decoder: KeyDecoder,
    renderer: DiffRenderer,
    parser: vt100::Parser,
    layout: LayoutConfig,
    size: (u16, u16),
}

impl Harness {
    /// ASCII glyphs, default debounce.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            session: Session::new(SessionOptions::default()),
            handler: Recorder::default(),
            decoder: KeyDecoder::new(),
            renderer: DiffRenderer::new(),
            parser: vt100::Parser::new(height, width, 0),
            layout: LayoutConfig {
                options: UiOptions { ascii_only: true },
                ..LayoutConfig::default()
            },
            size: (width, height),
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        for key in self.decoder.feed(bytes) {
            self.session.handle_key(key, &mut self.handler);
        }
    }

    pub fn type_str(&mut self, text: &str) {
        self.feed(text.as_bytes());
    }

    /// What the host does when the escape timeout fires.
    pub fn flush_escape(&mut self) {
        for key in self.decoder.flush() {
            self.session.handle_key(key, &mut self.handler);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.parser = vt100::Parser::new(height, width, 0);
        self.session.notify_resize();
    }

    /// Let the debounce window elapse and draw. Returns the bytes written,
    /// or `None` when no redraw was pending.
    pub fn render(&mut self) -> Option<String> {
        let redraw = self.session.poll_redraw(Instant::now() + SETTLE)?;
        let frame = compose(self.session.state(), self.size, &self.layout);
        let mut out = Vec::new();
        self.renderer
            .draw(&mut out, frame, self.size, redraw)
            .expect("writing to a Vec cannot fail");
        self.parser.process(&out);
        Some(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn frames_written(&self) -> u64 {
        self.renderer.frames_written()
    }

    pub fn row(&self, row: usize) -> String {
        self.rows().into_iter().nth(row).unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<String> {
        self.parser
            .screen()
            .rows(0, self.size.0)
            .map(|row| row.trim_end().to_owned())
            .collect()
    }

    /// Screen text with trailing blank rows removed.
    pub fn screen_text(&self) -> String {
        let mut rows = self.rows();
        while rows.last().is_some_and(String::is_empty) {
            rows.pop();
        }
        rows.join("\n")
    }

    /// Whether the cell at (row, column) is drawn in reverse video.
    pub fn inverse_at(&self, row: u16, col: u16) -> bool {
        self.parser
            .screen()
            .cell(row, col)
            .is_some_and(vt100::Cell::inverse)
    }

    /// Physical cursor as (row, column).
    pub fn cursor(&self) -> (u16, u16) {
        self.parser.screen().cursor_position()
    }
}
