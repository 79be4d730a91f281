//! Integration test aggregator
//!
//! Drives bytes through the decoder, the session and the renderer into a
//! vt100 virtual screen. Test modules are declared in `suite/mod.rs`.

mod common;
mod suite;
