//! Frame composition: the fixed chat/status/input/overlay layout.
//!
//! A [`Frame`] is plain data (rows of styled spans plus a cursor position) so
//! two frames can be compared for equality before anything is written.

use std::time::Duration;

use weft_engine::{ChatMessage, ConfirmationDialog, RenderState, Role};
use weft_types::sanitize_display_text;
use unicode_segmentation::UnicodeSegmentation;
use weft_types::ui::{SuggestionOverlay, UiOptions};

use crate::layout::{CursorPos, display_width, truncate, wrap, wrap_words};
use crate::theme::{Glyphs, glyphs};

pub const MAX_SUGGESTION_ROWS: usize = 8;
const MAX_DIALOG_DIFF_ROWS: usize = 10;
const MESSAGE_INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub text: String,
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span {
                text: text.into(),
                reverse: false,
            }],
        }
    }

    #[must_use]
    pub fn reversed(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span {
                text: text.into(),
                reverse: true,
            }],
        }
    }

    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(|span| display_width(&span.text)).sum()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Cut to `width` columns, dropping spans that no longer fit.
    fn fit(mut self, width: usize) -> Self {
        let mut remaining = width;
        for span in &mut self.spans {
            let cut = truncate(&span.text, remaining);
            remaining -= display_width(&cut);
            span.text = cut;
        }
        self.spans.retain(|span| !span.text.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<Line>,
    /// (column, row), zero-based.
    cursor: (u16, u16),
}

impl Frame {
    #[must_use]
    pub fn new(lines: Vec<Line>, cursor: (u16, u16)) -> Self {
        Self { lines, cursor }
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Rows joined by `\n` with trailing blanks trimmed and styles dropped.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text().trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Rows subtracted from the terminal height to size the chat window.
    pub reserved_rows: u16,
    pub min_visible_messages: usize,
    pub options: UiOptions,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reserved_rows: 10,
            min_visible_messages: 5,
            options: UiOptions::default(),
        }
    }
}

impl LayoutConfig {
    /// How many trailing messages the chat window considers.
    #[must_use]
    pub fn visible_messages(&self, height: u16) -> usize {
        usize::from(height.saturating_sub(self.reserved_rows)).max(self.min_visible_messages)
    }
}

/// Compose the frame for `state` on a `(width, height)` terminal.
///
/// The result never has more rows than `height`. The overlay gets the rows
/// left under the input box (at least one, scrolled to its selection), chat
/// rows are clipped from the top next, then whole rows from the top of the
/// frame.
#[must_use]
pub fn compose(state: &RenderState, size: (u16, u16), config: &LayoutConfig) -> Frame {
    let width = usize::from(size.0).max(1);
    let height = usize::from(size.1).max(1);
    let g = glyphs(config.options);

    let header = header_lines(state, width, &g);

    let visible = config.visible_messages(size.1);
    let messages = state.messages();
    let start = messages.len().saturating_sub(visible);
    let mut chat = Vec::new();
    for (i, message) in messages[start..].iter().enumerate() {
        if i > 0 {
            chat.push(Line::default());
        }
        chat.extend(message_lines(message, width, &g));
    }

    let status = status_line(state, &g);
    let (input, input_cursor) = input_lines(state, width, &g);
    let overlay_budget = height
        .saturating_sub(header.len() + 1 + input.len())
        .max(1);
    let overlay = match state.dialog() {
        Some(dialog) => dialog_lines(dialog, width, &g, config.options, overlay_budget),
        None => suggestion_lines(
            state.suggestions(),
            &g,
            overlay_budget.min(MAX_SUGGESTION_ROWS),
        ),
    };

    let fixed = header.len() + 1 + input.len() + overlay.len();
    let chat_budget = height.saturating_sub(fixed);
    if chat.len() > chat_budget {
        chat.drain(..chat.len() - chat_budget);
    }

    let input_top = header.len() + chat.len() + 1;
    let mut lines: Vec<Line> = header;
    lines.extend(chat);
    lines.push(status);
    lines.extend(input);
    lines.extend(overlay);

    let mut cursor_row = input_top + input_cursor.1;
    if lines.len() > height {
        let skip = lines.len() - height;
        lines.drain(..skip);
        cursor_row = cursor_row.saturating_sub(skip);
    }
    lines.truncate(height);

    let lines = lines.into_iter().map(|line| line.fit(width)).collect();
    let cursor_col = input_cursor.0.min(width - 1);
    Frame {
        lines,
        cursor: (cursor_col as u16, cursor_row.min(height - 1) as u16),
    }
}

fn clean(text: &str) -> String {
    sanitize_display_text(text).into_owned()
}

fn header_lines(state: &RenderState, width: usize, g: &Glyphs) -> Vec<Line> {
    let mut title = format!("weft{}{}", g.separator, clean(state.model()));
    if let Some(file) = state.active_file() {
        title.push_str(&format!("{}file: {}", g.separator, clean(file)));
    }
    if let Some(mcp) = state.mcp_status() {
        title.push_str(&format!("{}mcp: {}", g.separator, clean(mcp)));
    }
    vec![Line::plain(title), Line::plain(g.rule.repeat(width))]
}

fn message_lines(message: &ChatMessage, width: usize, g: &Glyphs) -> Vec<Line> {
    let marker = g.role(message.role());
    let body_width = width.saturating_sub(MESSAGE_INDENT.len());
    let content = clean(message.content());
    let mut lines = Vec::new();

    let label = match (message.role(), message.tool_name()) {
        (Role::Tool, Some(name)) => Some(clean(name)),
        (Role::Tool, None) => Some("tool".to_owned()),
        _ => None,
    };
    let label = match (label, message.file_label()) {
        (Some(label), Some(file)) => Some(format!("{label} {}", clean(file))),
        (None, Some(file)) => Some(clean(file)),
        (label, None) => label,
    };

    let body = wrap_words(&content, body_width);
    match label {
        Some(label) => {
            lines.push(Line::plain(format!("{marker} {label}")));
            if !content.is_empty() {
                lines.extend(
                    body.into_iter()
                        .map(|row| Line::plain(format!("{MESSAGE_INDENT}{row}"))),
                );
            }
        }
        None => {
            for (i, row) in body.into_iter().enumerate() {
                let prefix = if i == 0 {
                    format!("{marker} ")
                } else {
                    MESSAGE_INDENT.to_owned()
                };
                lines.push(Line::plain(format!("{prefix}{row}")));
            }
        }
    }

    if let Some(diff) = message.diff() {
        let diff = clean(diff.as_str());
        lines.extend(
            diff.lines()
                .map(|row| Line::plain(format!("{MESSAGE_INDENT}{}{row}", g.diff_gutter))),
        );
    }
    lines
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

fn status_line(state: &RenderState, g: &Glyphs) -> Line {
    let activity = state.activity();
    let mut text = format!(
        "{} {}",
        g.status(activity.status, activity.elapsed),
        activity.status.label()
    );
    if let Some(elapsed) = activity.elapsed {
        text.push_str(&format!(" ({})", format_elapsed(elapsed)));
    }
    if let Some(tokens) = state.token_count() {
        text.push_str(&format!("{}{tokens} tokens", g.separator));
    }
    if state.auto_edit() {
        text.push_str(&format!("{}auto-edit", g.separator));
    }
    if state.input().multiline {
        text.push_str(&format!("{}multiline", g.separator));
    }
    Line::plain(text)
}

/// Input box rows and the cursor as (column, row offset from the box top).
fn input_lines(state: &RenderState, width: usize, g: &Glyphs) -> (Vec<Line>, (usize, usize)) {
    let input = state.input();
    let prompt_width = display_width(g.prompt);
    let wrapped = wrap(&input.text, width.saturating_sub(prompt_width), Some(input.cursor));

    let pos = wrapped.cursor.unwrap_or(CursorPos { row: 0, col: 0 });

    let mut lines = vec![Line::plain(g.rule.repeat(width))];
    for (i, row) in wrapped.rows.iter().enumerate() {
        let prefix = if i == 0 { g.prompt } else { g.continuation };
        if i == pos.row {
            lines.push(cursor_line(prefix, row, pos.col));
        } else {
            lines.push(Line::plain(format!("{prefix}{row}")));
        }
    }
    lines.push(Line::plain(g.rule.repeat(width)));

    (lines, (prompt_width + pos.col, pos.row + 1))
}

/// An input row with the cell under the cursor in reverse video; a blank cell
/// when the cursor sits past the last grapheme.
fn cursor_line(prefix: &str, row: &str, col: usize) -> Line {
    let mut before = prefix.to_owned();
    let mut under = " ";
    let mut used = 0;
    let mut graphemes = row.graphemes(true);
    for grapheme in graphemes.by_ref() {
        if used >= col {
            under = grapheme;
            break;
        }
        used += display_width(grapheme);
        before.push_str(grapheme);
    }
    let after: String = graphemes.collect();

    let mut spans = vec![
        Span {
            text: before,
            reverse: false,
        },
        Span {
            text: under.to_owned(),
            reverse: true,
        },
    ];
    if !after.is_empty() {
        spans.push(Span {
            text: after,
            reverse: false,
        });
    }
    Line { spans }
}

/// Keep at most `max` rows, scrolled so row `focus` stays visible.
fn scroll_to(mut lines: Vec<Line>, focus: usize, max: usize) -> Vec<Line> {
    if lines.len() <= max {
        return lines;
    }
    let start = (focus + 1).saturating_sub(max);
    lines.drain(..start);
    lines.truncate(max);
    lines
}

fn suggestion_lines(overlay: &SuggestionOverlay, g: &Glyphs, max_rows: usize) -> Vec<Line> {
    let Some(selected) = overlay.selected() else {
        return Vec::new();
    };
    let lines: Vec<Line> = overlay
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item = clean(item);
            if i == selected {
                Line::reversed(format!("{}{item}", g.selected))
            } else {
                Line::plain(format!("{}{item}", g.unselected))
            }
        })
        .collect();
    scroll_to(lines, selected, max_rows)
}

fn dialog_lines(
    dialog: &ConfirmationDialog,
    width: usize,
    g: &Glyphs,
    options: UiOptions,
    max_rows: usize,
) -> Vec<Line> {
    let mut lines = vec![Line::plain(clean(dialog.title()))];
    lines.extend(
        wrap_words(&clean(dialog.message()), width)
            .into_iter()
            .map(Line::plain),
    );
    if let Some(diff) = dialog.diff() {
        let diff = clean(diff.as_str());
        let mut rows = diff.lines();
        lines.extend(
            rows.by_ref()
                .take(MAX_DIALOG_DIFF_ROWS)
                .map(|row| Line::plain(format!("{}{row}", g.diff_gutter))),
        );
        let hidden = rows.count();
        if hidden > 0 {
            let ellipsis = if options.ascii_only { "..." } else { "…" };
            lines.push(Line::plain(format!("{}{ellipsis} {hidden} more", g.diff_gutter)));
        }
    }
    let mut focus = 0;
    for (i, option) in dialog.options().iter().enumerate() {
        let option = clean(option);
        if i == dialog.selected() {
            focus = lines.len();
            lines.push(Line::reversed(format!("{}{}. {option}", g.selected, i + 1)));
        } else {
            lines.push(Line::plain(format!("{}{}. {option}", g.unselected, i + 1)));
        }
    }
    let hint = if options.ascii_only {
        "Up/Down select | Enter confirm | Esc cancel"
    } else {
        "↑↓ select · Enter confirm · Esc cancel"
    };
    lines.push(Line::plain(hint));
    scroll_to(lines, focus, max_rows)
}
