//! Terminal side of weft: byte decoding, frame composition, diff rendering.
//!
//! Everything here except [`TerminalSession`] and [`InputPump::stdin`] is
//! pure over `Write`/`Read`, so the pipeline can be driven against buffers
//! and a vt100 parser in tests.

mod decoder;
mod frame;
mod layout;
mod plain;
mod pump;
mod renderer;
mod terminal;
mod theme;

pub use decoder::{ESCAPE_TIMEOUT, KeyDecoder};
pub use frame::{Frame, LayoutConfig, Line, MAX_SUGGESTION_ROWS, Span, compose};
pub use layout::{CursorPos, Wrapped, display_width, truncate, wrap, wrap_words};
pub use plain::{LineAssembler, PlainPrinter};
pub use pump::{InputMsg, InputPump};
pub use renderer::DiffRenderer;
pub use terminal::TerminalSession;
pub use theme::{Glyphs, glyphs};
