//! Raw keyboard bytes to [`Key`]s.
//!
//! Table-driven: escape sequences and control bytes are looked up in fixed
//! tables. Input may arrive split at any byte boundary; a proper prefix of a
//! known sequence or an incomplete UTF-8 character is held back until the
//! next chunk. A lone ESC stays pending until [`KeyDecoder::flush`], which the
//! host calls once its escape timeout expires.

use std::time::Duration;

use weft_engine::Key;

const ESC: u8 = 0x1b;

/// How long a lone ESC waits for the rest of a sequence.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

const SEQUENCES: &[(&[u8], Key)] = &[
    // Arrows, CSI and SS3 forms.
    (b"\x1b[A", Key::Up),
    (b"\x1b[B", Key::Down),
    (b"\x1b[C", Key::Right),
    (b"\x1b[D", Key::Left),
    (b"\x1bOA", Key::Up),
    (b"\x1bOB", Key::Down),
    (b"\x1bOC", Key::Right),
    (b"\x1bOD", Key::Left),
    // Home / End.
    (b"\x1b[H", Key::LineStart),
    (b"\x1b[F", Key::LineEnd),
    (b"\x1bOH", Key::LineStart),
    (b"\x1bOF", Key::LineEnd),
    (b"\x1b[1~", Key::LineStart),
    (b"\x1b[4~", Key::LineEnd),
    (b"\x1b[7~", Key::LineStart),
    (b"\x1b[8~", Key::LineEnd),
    (b"\x1b[3~", Key::Delete),
    // Ctrl+Right / Ctrl+Left.
    (b"\x1b[1;5C", Key::WordRight),
    (b"\x1b[1;5D", Key::WordLeft),
    (b"\x1b[Z", Key::BackTab),
    // Alt (meta sends ESC first).
    (b"\x1bb", Key::WordLeft),
    (b"\x1bf", Key::WordRight),
    (b"\x1b\x7f", Key::DeleteWordBackward),
    (b"\x1b\x08", Key::DeleteWordBackward),
    (b"\x1b\r", Key::Newline),
    (b"\x1b\n", Key::Newline),
];

fn control_key(byte: u8) -> Option<Key> {
    let key = match byte {
        0x01 => Key::LineStart,
        0x02 => Key::Left,
        0x03 => Key::Interrupt,
        0x04 => Key::Delete,
        0x05 => Key::LineEnd,
        0x06 => Key::Right,
        0x08 | 0x7f => Key::Backspace,
        b'\t' => Key::Tab,
        b'\r' | b'\n' => Key::Enter,
        0x0b => Key::KillToLineEnd,
        0x0c => Key::Redraw,
        0x0e => Key::HistoryNext,
        0x10 => Key::HistoryPrev,
        0x15 => Key::KillToLineStart,
        0x17 => Key::DeleteWordBackward,
        _ => return None,
    };
    Some(key)
}

enum Step {
    Emit(Key, usize),
    Skip(usize),
    Incomplete,
}

#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` (plus anything held back) as possible.
    ///
    /// CR LF inside one read is a single Enter. An LF in a later read is a
    /// keypress of its own (Ctrl+J), even when the previous read ended on CR.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Key> {
        self.pending.extend_from_slice(bytes);
        let mut keys = Vec::new();
        let mut pos = 0;
        let mut after_cr = false;
        while pos < self.pending.len() {
            let rest = &self.pending[pos..];
            match decode_one(rest) {
                Step::Emit(key, len) => {
                    let from_cr = rest[0] == b'\r';
                    let swallow = rest[0] == b'\n' && after_cr;
                    after_cr = from_cr;
                    if !swallow {
                        keys.push(key);
                    }
                    pos += len;
                }
                Step::Skip(len) => {
                    tracing::debug!(bytes = ?&rest[..len], "dropped unrecognized input");
                    after_cr = false;
                    pos += len;
                }
                Step::Incomplete => break,
            }
        }
        self.pending.drain(..pos);
        keys
    }

    /// True when a lone ESC (or a partial escape sequence) is waiting.
    #[must_use]
    pub fn has_pending_escape(&self) -> bool {
        self.pending.first() == Some(&ESC)
    }

    /// Resolve a held-back escape prefix after the escape timeout.
    ///
    /// A lone ESC becomes [`Key::Escape`]; a longer unfinished sequence is
    /// dropped. Partial UTF-8 stays buffered.
    pub fn flush(&mut self) -> Vec<Key> {
        if !self.has_pending_escape() {
            return Vec::new();
        }
        if self.pending.len() == 1 {
            self.pending.clear();
            return vec![Key::Escape];
        }
        tracing::debug!(bytes = ?self.pending, "dropped unfinished escape sequence");
        self.pending.clear();
        Vec::new()
    }
}

fn decode_one(buf: &[u8]) -> Step {
    match buf[0] {
        ESC => decode_escape(buf),
        byte @ (0x00..=0x1f | 0x7f) => match control_key(byte) {
            Some(key) => Step::Emit(key, 1),
            None => Step::Skip(1),
        },
        byte @ 0x20..=0x7e => Step::Emit(Key::Char(char::from(byte)), 1),
        _ => decode_utf8(buf),
    }
}

fn decode_escape(buf: &[u8]) -> Step {
    if buf.len() == 1 {
        return Step::Incomplete;
    }
    if let Some((seq, key)) = SEQUENCES.iter().find(|(seq, _)| buf.starts_with(seq)) {
        return Step::Emit(*key, seq.len());
    }
    if SEQUENCES
        .iter()
        .any(|(seq, _)| seq.len() > buf.len() && seq.starts_with(buf))
    {
        return Step::Incomplete;
    }
    match buf[1] {
        // ESC ESC: the first one is a plain Escape.
        ESC => Step::Emit(Key::Escape, 1),
        b'[' => skip_csi(buf),
        b'O' => {
            if buf.len() < 3 {
                Step::Incomplete
            } else {
                Step::Skip(3)
            }
        }
        // Unbound Alt+key.
        _ => Step::Skip(2),
    }
}

/// Unknown CSI: parameter and intermediate bytes up to a final byte in `@..=~`.
fn skip_csi(buf: &[u8]) -> Step {
    for (i, &byte) in buf.iter().enumerate().skip(2) {
        match byte {
            0x20..=0x3f => {}
            0x40..=0x7e => return Step::Skip(i + 1),
            _ => return Step::Skip(i),
        }
    }
    Step::Incomplete
}

fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

fn decode_utf8(buf: &[u8]) -> Step {
    let Some(len) = utf8_len(buf[0]) else {
        return Step::Skip(1);
    };
    let available = buf.len().min(len);
    if buf[1..available].iter().any(|b| b & 0xc0 != 0x80) {
        return Step::Skip(1);
    }
    if buf.len() < len {
        return Step::Incomplete;
    }
    match std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
    {
        Some(c) if !c.is_control() => Step::Emit(Key::Char(c), len),
        Some(_) => Step::Skip(len),
        None => Step::Skip(1),
    }
}
