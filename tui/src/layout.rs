//! Display-width wrapping and logical-to-physical cursor mapping.
//!
//! Widths are terminal columns (`unicode-width`); cursor offsets are grapheme
//! clusters, matching the line buffer.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Physical position relative to the first row of the wrapped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    pub rows: Vec<String>,
    pub cursor: Option<CursorPos>,
}

/// Wrap `text` to `width` columns, breaking on `\n` and wherever the next
/// grapheme would overflow the row.
///
/// A cursor sitting right after a completely full row is placed at the start
/// of the following row (adding an empty row at the end of the text if
/// needed). Offsets past the end clamp to the end.
#[must_use]
pub fn wrap(text: &str, width: usize, cursor: Option<usize>) -> Wrapped {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut col = 0;
    let mut pos = None;
    let mut count = 0;

    for (index, grapheme) in text.graphemes(true).enumerate() {
        count = index + 1;
        if cursor == Some(index) {
            pos = Some(cursor_at(rows.len() - 1, col, width));
        }
        if grapheme == "\n" {
            rows.push(String::new());
            col = 0;
            continue;
        }
        let w = grapheme.width();
        if col > 0 && col + w > width {
            rows.push(String::new());
            col = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push_str(grapheme);
        }
        col += w;
    }

    if cursor.is_some_and(|c| c >= count) {
        let at = cursor_at(rows.len() - 1, col, width);
        if at.row == rows.len() {
            rows.push(String::new());
        }
        pos = Some(at);
    }

    Wrapped { rows, cursor: pos }
}

fn cursor_at(row: usize, col: usize, width: usize) -> CursorPos {
    if col >= width {
        CursorPos { row: row + 1, col: 0 }
    } else {
        CursorPos { row, col }
    }
}

/// Greedy word wrap for transcript text. Words wider than `width` are broken
/// with [`wrap`].
#[must_use]
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let mut row = String::new();
        let mut used = 0;
        let mut started = false;
        for word in line.split(' ') {
            let w = display_width(word);
            if started && used + 1 + w > width {
                rows.push(std::mem::take(&mut row));
                used = 0;
                started = false;
            }
            if started {
                row.push(' ');
                used += 1;
            }
            if w > width {
                let mut pieces = wrap(word, width, None).rows;
                row = pieces.pop().unwrap_or_default();
                used = display_width(&row);
                rows.extend(pieces);
            } else {
                row.push_str(word);
                used += w;
            }
            started = true;
        }
        rows.push(row);
    }
    rows
}

/// Cut `text` to at most `width` columns.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out
}

#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}
