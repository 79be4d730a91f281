//! Display sanitization for text that ends up inside a rendered frame.
//!
//! Message bodies, labels and dialog text come from external event sources.
//! An embedded escape sequence would move the physical cursor mid-frame and
//! desynchronize the diff renderer from what is actually on screen, so every
//! piece of foreign text passes through [`sanitize_display_text`] first.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const TAB_STOP: &str = "    ";

/// Strip escape sequences and control characters, keeping `\n`.
///
/// Tabs expand to four spaces so display-width math stays exact. CSI, OSC and
/// two-byte escapes are removed whole; C0/C1 controls, `\r` and DEL are
/// dropped.
///
/// ```
/// use weft_types::sanitize_display_text;
///
/// assert_eq!(sanitize_display_text("plain"), "plain");
/// assert_eq!(sanitize_display_text("a\x1b[2Jb"), "ab");
/// assert_eq!(sanitize_display_text("x\ty"), "x    y");
/// ```
#[must_use]
pub fn sanitize_display_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str(TAB_STOP),
            ESC => match chars.next() {
                Some('[') => {
                    // CSI: parameters and intermediates until a final byte.
                    for next in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']' | 'P' | '_' | '^') => {
                    // OSC / DCS / APC / PM: string terminated by BEL or ST.
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if is_unsafe(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_unsafe(c: char) -> bool {
    (c.is_control() && c != '\n') || c == '\u{7f}'
}
