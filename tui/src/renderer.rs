//! Full-frame diff renderer.
//!
//! Keeps the last frame written. An identical frame writes nothing; any other
//! frame is rewritten row by row with absolute addressing. The screen is only
//! cleared for the first frame, after a size change, or on request.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use weft_engine::Redraw;

use crate::frame::Frame;

#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous: Option<Frame>,
    size: Option<(u16, u16)>,
    frames_written: u64,
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last frame so the next draw clears the screen.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write `frame` if it differs from the last one. Returns whether
    /// anything was written.
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        frame: Frame,
        size: (u16, u16),
        redraw: Redraw,
    ) -> io::Result<bool> {
        let full = redraw == Redraw::Full || self.size != Some(size) || self.previous.is_none();
        if !full && self.previous.as_ref() == Some(&frame) {
            tracing::trace!("frame unchanged, skipping write");
            return Ok(false);
        }

        let previous_rows = self.previous.as_ref().map_or(0, |prev| prev.lines().len());
        let width = usize::from(size.0);

        queue!(out, Hide)?;
        if full {
            queue!(out, Clear(ClearType::All))?;
        }
        queue!(out, MoveTo(0, 0))?;
        for (row, line) in frame.lines().iter().enumerate() {
            queue!(out, MoveTo(0, row as u16))?;
            for span in line.spans() {
                if span.reverse {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reverse),
                        Print(&span.text),
                        SetAttribute(Attribute::NoReverse)
                    )?;
                } else {
                    queue!(out, Print(&span.text))?;
                }
            }
            let pad = width.saturating_sub(line.width());
            if pad > 0 {
                queue!(out, Print(" ".repeat(pad)))?;
            }
        }
        if !full && previous_rows > frame.lines().len() {
            queue!(
                out,
                MoveTo(0, frame.lines().len() as u16),
                Clear(ClearType::FromCursorDown)
            )?;
        }
        let (col, row) = frame.cursor();
        queue!(out, MoveTo(col, row), Show)?;
        out.flush()?;

        self.frames_written += 1;
        tracing::trace!(full, rows = frame.lines().len(), "frame written");
        self.previous = Some(frame);
        self.size = Some(size);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use weft_engine::Redraw;

    use super::DiffRenderer;
    use crate::frame::{Frame, Line};

    const CLEAR_ALL: &str = "\x1b[2J";
    const CLEAR_DOWN: &str = "\x1b[J";

    fn frame(rows: &[&str], cursor: (u16, u16)) -> Frame {
        Frame::new(rows.iter().map(|r| Line::plain(*r)).collect(), cursor)
    }

    fn draw(renderer: &mut DiffRenderer, frame: Frame, size: (u16, u16)) -> (bool, String) {
        let mut out = Vec::new();
        let wrote = renderer.draw(&mut out, frame, size, Redraw::Diff).unwrap();
        (wrote, String::from_utf8(out).unwrap())
    }

    #[test]
    fn first_frame_clears_screen() {
        let mut renderer = DiffRenderer::new();
        let (wrote, out) = draw(&mut renderer, frame(&["a"], (1, 0)), (10, 5));
        assert!(wrote);
        assert!(out.contains(CLEAR_ALL));
        assert!(out.ends_with("\x1b[1;2H\x1b[?25h"));
    }

    #[test]
    fn identical_frame_writes_nothing() {
        let mut renderer = DiffRenderer::new();
        draw(&mut renderer, frame(&["a", "b"], (0, 0)), (10, 5));
        let (wrote, out) = draw(&mut renderer, frame(&["a", "b"], (0, 0)), (10, 5));
        assert!(!wrote);
        assert!(out.is_empty());
        assert_eq!(renderer.frames_written(), 1);
    }

    #[test]
    fn changed_frame_rewrites_without_clearing() {
        let mut renderer = DiffRenderer::new();
        draw(&mut renderer, frame(&["a", "b"], (0, 0)), (10, 5));
        let (wrote, out) = draw(&mut renderer, frame(&["a", "c"], (0, 1)), (10, 5));
        assert!(wrote);
        assert!(!out.contains(CLEAR_ALL));
        assert!(!out.contains(CLEAR_DOWN));
        assert!(out.contains("\x1b[2;1Hc"));
    }

    #[test]
    fn shorter_frame_clears_below() {
        let mut renderer = DiffRenderer::new();
        draw(&mut renderer, frame(&["a", "b", "c"], (0, 0)), (10, 5));
        let (_, out) = draw(&mut renderer, frame(&["a"], (0, 0)), (10, 5));
        assert!(out.contains(&format!("\x1b[2;1H{CLEAR_DOWN}")));
        assert!(!out.contains(CLEAR_ALL));
    }

    #[test]
    fn resize_forces_full_clear() {
        let mut renderer = DiffRenderer::new();
        draw(&mut renderer, frame(&["a"], (0, 0)), (10, 5));
        let (wrote, out) = draw(&mut renderer, frame(&["a"], (0, 0)), (12, 5));
        assert!(wrote);
        assert!(out.contains(CLEAR_ALL));
    }

    #[test]
    fn explicit_full_redraw_rewrites_identical_frame() {
        let mut renderer = DiffRenderer::new();
        draw(&mut renderer, frame(&["a"], (0, 0)), (10, 5));
        let mut out = Vec::new();
        let wrote = renderer
            .draw(&mut out, frame(&["a"], (0, 0)), (10, 5), Redraw::Full)
            .unwrap();
        assert!(wrote);
        assert!(String::from_utf8(out).unwrap().contains(CLEAR_ALL));
    }

    #[test]
    fn rows_are_padded_and_reverse_spans_are_marked() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        let f = Frame::new(vec![Line::reversed("hi")], (0, 0));
        renderer.draw(&mut out, f, (6, 2), Redraw::Diff).unwrap();

        let mut parser = vt100::Parser::new(2, 6, 0);
        parser.process(&out);
        let screen = parser.screen();
        assert_eq!(screen.cell(0, 0).unwrap().contents(), "h");
        assert_eq!(screen.cell(0, 1).unwrap().contents(), "i");
        assert!(screen.cell(0, 0).unwrap().inverse());
        assert!(!screen.cell(0, 2).unwrap().inverse());
        assert_eq!(screen.cursor_position(), (0, 0));
    }
}
