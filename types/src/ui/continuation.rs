//! Multiline continuation heuristic for Enter.
//!
//! This is a parity count, not a parser. Escaped or nested quotes are not
//! tracked, so text with a literal unbalanced quote or bracket (an apostrophe
//! in "don't", a shell glob like `[a-`) keeps Enter in continuation mode until
//! the user balances it or inserts the closing character.

const QUOTES: [char; 3] = ['\'', '"', '`'];
const OPENERS: [char; 3] = ['(', '[', '{'];
const CLOSERS: [char; 3] = [')', ']', '}'];

/// Whether Enter on `text` should insert a newline instead of submitting.
#[must_use]
pub fn needs_continuation(text: &str) -> bool {
    let mut quote_counts = [0usize; QUOTES.len()];
    let mut opened = 0usize;
    let mut closed = 0usize;

    for c in text.chars() {
        if let Some(slot) = QUOTES.iter().position(|q| *q == c) {
            quote_counts[slot] += 1;
        } else if OPENERS.contains(&c) {
            opened += 1;
        } else if CLOSERS.contains(&c) {
            closed += 1;
        }
    }

    quote_counts.iter().any(|count| count % 2 == 1) || opened > closed
}
