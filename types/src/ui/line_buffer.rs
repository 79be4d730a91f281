//! Grapheme-aware text buffer with a cursor.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// The in-progress, unsubmitted text and a cursor counted in grapheme clusters.
///
/// Invariant: `cursor <= grapheme_count()` after every operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.text.insert(index, c);
        self.cursor = self.grapheme_index_of(index + c.len_utf8());
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index();
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }
        let start = self.byte_index();
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    /// Move by `delta` graphemes, clamped to the buffer bounds.
    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta);
        self.cursor = target.min(self.grapheme_count());
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    /// Start of the `\n`-delimited line holding the cursor.
    pub fn move_to_line_start(&mut self) {
        self.cursor = self.grapheme_index_of(self.line_start_byte());
    }

    /// End of the `\n`-delimited line holding the cursor.
    pub fn move_to_line_end(&mut self) {
        self.cursor = self.grapheme_index_of(self.line_end_byte());
    }

    /// Skip whitespace, then the following run of non-whitespace.
    pub fn move_word_forward(&mut self) {
        let count = self.grapheme_count();
        let mut pos = self.cursor;
        while pos < count && self.is_whitespace_at(pos) {
            pos += 1;
        }
        while pos < count && !self.is_whitespace_at(pos) {
            pos += 1;
        }
        self.cursor = pos;
    }

    /// Skip whitespace to the left, then the run of non-whitespace before it.
    pub fn move_word_backward(&mut self) {
        self.cursor = self.word_start_before_cursor();
    }

    pub fn delete_word_backward(&mut self) {
        let start = self.word_start_before_cursor();
        self.delete_graphemes(start, self.cursor);
        self.cursor = start;
    }

    pub fn delete_to_line_end(&mut self) {
        let start = self.byte_index();
        let end = self.line_end_byte();
        self.text.replace_range(start..end, "");
    }

    pub fn delete_to_line_start(&mut self) {
        let start = self.line_start_byte();
        let end = self.byte_index();
        self.text.replace_range(start..end, "");
        self.cursor = self.grapheme_index_of(start);
    }

    /// Replace the whole buffer; the cursor moves to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.grapheme_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Number of graphemes that start before `byte`.
    fn grapheme_index_of(&self, byte: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .take_while(|(i, _)| *i < byte)
            .count()
    }

    fn line_start_byte(&self) -> usize {
        let cursor = self.byte_index();
        self.text[..cursor].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end_byte(&self) -> usize {
        let cursor = self.byte_index();
        self.text[cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| cursor + i)
    }

    fn is_whitespace_at(&self, index: usize) -> bool {
        self.text
            .graphemes(true)
            .nth(index)
            .is_some_and(|g| g.chars().all(char::is_whitespace))
    }

    fn word_start_before_cursor(&self) -> usize {
        let mut pos = self.cursor;
        while pos > 0 && self.is_whitespace_at(pos - 1) {
            pos -= 1;
        }
        while pos > 0 && !self.is_whitespace_at(pos - 1) {
            pos -= 1;
        }
        pos
    }

    fn delete_graphemes(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let start = self.byte_index_at(from);
        let end = self.byte_index_at(to);
        self.text.replace_range(start..end, "");
    }
}
