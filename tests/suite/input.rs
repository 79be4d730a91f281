//! Raw bytes through the decoder into session routing.

use weft_engine::{ConfirmationDialog, SpecialKey};

use crate::common::Harness;

fn input_text(h: &Harness) -> &str {
    h.session.editor().buffer().text()
}

#[test]
fn typed_line_is_submitted_and_box_cleared() {
    let mut h = Harness::new(20, 8);
    h.type_str("hi\r");
    assert_eq!(h.handler.lines, ["hi"]);
    h.render();
    assert_eq!(h.row(4), ">");
    assert_eq!(h.cursor(), (4, 2));
}

#[test]
fn whitespace_only_line_is_discarded() {
    let mut h = Harness::new(20, 8);
    h.type_str("   \r");
    assert!(h.handler.lines.is_empty());
    assert_eq!(input_text(&h), "");
}

#[test]
fn arrow_keys_edit_mid_line() {
    let mut h = Harness::new(20, 8);
    h.type_str("ac");
    h.feed(b"\x1b[D");
    h.type_str("b\r");
    assert_eq!(h.handler.lines, ["abc"]);
}

#[test]
fn sequence_split_across_reads() {
    let mut h = Harness::new(20, 8);
    h.type_str("xy");
    h.feed(b"\x1b");
    h.feed(b"[");
    h.feed(b"D");
    h.type_str("-");
    assert_eq!(input_text(&h), "x-y");
    assert!(h.handler.specials.is_empty());
}

#[test]
fn utf8_split_across_reads() {
    let mut h = Harness::new(20, 8);
    h.feed(&[0xC3]);
    assert_eq!(input_text(&h), "");
    h.feed(&[0xA9]);
    h.type_str("\r");
    assert_eq!(h.handler.lines, ["é"]);
}

#[test]
fn lone_escape_cancels_after_timeout() {
    let mut h = Harness::new(20, 8);
    h.feed(b"\x1b");
    assert!(h.handler.specials.is_empty());
    h.flush_escape();
    assert_eq!(h.handler.specials, [SpecialKey::Cancel]);
}

#[test]
fn alt_enter_inserts_newline() {
    let mut h = Harness::new(20, 10);
    h.feed(b"a\x1b\rb");
    h.render();
    assert_eq!(h.row(4), "> a");
    assert_eq!(h.row(5), "  b");
    assert!(h.row(2).contains("multiline"));
    assert_eq!(h.cursor(), (5, 3));

    h.type_str("\r");
    assert_eq!(h.handler.lines, ["a\nb"]);
}

#[test]
fn open_bracket_continues_line() {
    let mut h = Harness::new(20, 10);
    h.type_str("f(\r");
    assert!(h.handler.lines.is_empty());
    h.type_str("x)\r");
    assert_eq!(h.handler.lines, ["f(\nx)"]);
}

#[test]
fn tab_accepts_suggestion_then_enter_submits() {
    let mut h = Harness::new(30, 20);
    h.type_str("/he");
    h.render();
    assert_eq!(h.row(6), "> /help");

    h.type_str("\t");
    assert_eq!(input_text(&h), "/help");
    h.render();
    assert_eq!(h.row(4), "> /help");
    assert_eq!(h.row(6), "");

    h.type_str("\r");
    assert_eq!(h.handler.lines, ["/help"]);
}

#[test]
fn overlay_arrows_move_selection() {
    let mut h = Harness::new(30, 20);
    h.type_str("/c");
    h.feed(b"\x1b[B");
    h.type_str("\t");
    assert_eq!(input_text(&h), "/confirm");
}

#[test]
fn history_recall_restores_draft() {
    let mut h = Harness::new(20, 8);
    h.type_str("one\r");
    h.type_str("two\r");
    h.type_str("dra");

    h.feed(b"\x1b[A");
    assert_eq!(input_text(&h), "two");
    h.feed(b"\x1b[A");
    assert_eq!(input_text(&h), "one");
    h.feed(b"\x1b[B");
    assert_eq!(input_text(&h), "two");
    h.feed(b"\x1b[B");
    assert_eq!(input_text(&h), "dra");
}

#[test]
fn dialog_selection_is_reported_as_line() {
    let mut h = Harness::new(30, 20);
    h.session
        .show_confirmation(ConfirmationDialog::new("Apply?", "x.rs", ["Yes", "No"]));
    h.render();
    assert_eq!(h.row(6), "Apply?");
    assert_eq!(h.row(8), "> 1. Yes");

    h.feed(b"\x1b[B");
    h.render();
    assert_eq!(h.row(9), "> 2. No");

    h.type_str("\r");
    assert_eq!(h.handler.lines, ["No"]);
    assert!(h.session.state().dialog().is_none());
    assert!(h.session.editor().history().is_empty());
}

#[test]
fn control_keys_reach_the_host() {
    let mut h = Harness::new(20, 8);
    h.render();
    h.feed(&[0x03, 0x0c]);
    assert_eq!(
        h.handler.specials,
        [SpecialKey::Interrupt, SpecialKey::Redraw]
    );
    let out = h.render().unwrap_or_default();
    assert!(out.contains("\x1b[2J"));
}

#[test]
fn back_tab_toggles_auto_edit() {
    let mut h = Harness::new(30, 8);
    h.feed(b"\x1b[Z");
    assert_eq!(h.handler.specials, [SpecialKey::Toggle]);
    assert!(h.session.state().auto_edit());
    h.render();
    assert_eq!(h.row(2), "* ready | auto-edit");
}
