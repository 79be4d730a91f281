//! Session → frame → diff renderer → virtual screen.

use weft_engine::{MessageMeta, Role};

use crate::common::Harness;

const CLEAR_ALL: &str = "\x1b[2J";

#[test]
fn first_frame_draws_empty_layout() {
    let mut h = Harness::new(20, 8);
    let out = h.render().expect("initial redraw is scheduled");
    assert!(out.contains(CLEAR_ALL));
    insta::assert_snapshot!(h.screen_text(), @r"
    weft | echo-1
    --------------------
    * ready
    --------------------
    >
    --------------------
    ");
    assert_eq!(h.cursor(), (4, 2));
}

#[test]
fn burst_of_mutations_produces_one_frame() {
    let mut h = Harness::new(40, 30);
    h.render();
    assert_eq!(h.frames_written(), 1);

    for i in 0..10 {
        h.session
            .add_message(Role::Assistant, format!("reply {i}"), MessageMeta::default());
    }
    assert!(h.render().is_some_and(|out| !out.is_empty()));
    assert_eq!(h.frames_written(), 2);
    assert_eq!(h.render(), None);
}

#[test]
fn unchanged_state_writes_nothing() {
    let mut h = Harness::new(20, 8);
    h.render();
    h.session.set_model("echo-1");
    assert_eq!(h.render().as_deref(), Some(""));
    assert_eq!(h.frames_written(), 1);
}

#[test]
fn update_rewrites_without_clearing() {
    let mut h = Harness::new(20, 10);
    h.render();
    h.session.set_model("other");
    let out = h.render().unwrap_or_default();
    assert!(!out.contains(CLEAR_ALL));
    assert_eq!(h.row(0), "weft | other");
}

#[test]
fn resize_forces_full_clear_and_relayout() {
    let mut h = Harness::new(20, 10);
    h.render();
    h.resize(30, 8);
    let out = h.render().expect("resize schedules a redraw");
    assert!(out.contains(CLEAR_ALL));
    assert_eq!(h.row(1), "-".repeat(30));
    assert_eq!(h.row(5), "-".repeat(30));
}

#[test]
fn reported_resize_clears_even_when_size_is_unchanged() {
    let mut h = Harness::new(20, 10);
    h.render();
    h.session.notify_resize();
    h.session.notify_resize();
    let out = h.render().expect("resize schedules a redraw");
    assert!(out.contains(CLEAR_ALL));
    assert_eq!(h.row(0), "weft | echo-1");
    assert_eq!(h.frames_written(), 2);
}

#[test]
fn cursor_tracks_logical_offset() {
    let mut h = Harness::new(20, 8);
    h.type_str("hello");
    h.feed(b"\x1b[D\x1b[D");
    h.render();
    assert_eq!(h.row(4), "> hello");
    assert_eq!(h.cursor(), (4, 5));
    assert!(h.inverse_at(4, 5));
    assert!(!h.inverse_at(4, 4));
    assert!(!h.inverse_at(4, 6));
}

#[test]
fn cursor_at_end_of_input_is_a_reversed_blank() {
    let mut h = Harness::new(20, 8);
    h.type_str("hi");
    h.render();
    assert_eq!(h.cursor(), (4, 4));
    assert!(h.inverse_at(4, 4));
    assert!(!h.inverse_at(4, 3));
}

#[test]
fn short_terminal_keeps_input_box_and_selected_suggestion() {
    let mut h = Harness::new(20, 6);
    h.type_str("/");
    h.render();
    let rows = h.rows();
    assert_eq!(rows.len(), 6);
    assert_eq!(h.row(3), "> /");
    assert_eq!(h.row(5), "> /clear");
    assert!(h.inverse_at(5, 0));
    assert_eq!(h.cursor(), (3, 3));
}

#[test]
fn cursor_after_full_row_wraps_to_next_row() {
    let mut h = Harness::new(10, 10);
    h.type_str("abcdefgh");
    h.render();
    assert_eq!(h.row(4), "> abcdefgh");
    assert_eq!(h.row(5), "");
    assert_eq!(h.row(6), "-".repeat(10));
    assert_eq!(h.cursor(), (5, 2));
}

#[test]
fn long_transcript_is_clipped_to_height() {
    let mut h = Harness::new(20, 10);
    for i in 0..40 {
        h.session
            .add_message(Role::User, format!("msg {i}"), MessageMeta::default());
    }
    h.render();
    assert_eq!(h.row(0), "weft | echo-1");
    assert_eq!(h.row(3), "> msg 38");
    assert_eq!(h.row(5), "> msg 39");
    assert_eq!(h.row(6), "* ready");
    assert_eq!(h.rows().len(), 10);
}

#[test]
fn closing_overlay_clears_rows_below() {
    let mut h = Harness::new(20, 20);
    h.type_str("/");
    h.render();
    assert_eq!(h.row(6), "> /clear");
    assert_eq!(h.row(7), "  /confirm");

    h.feed(b"\x1b");
    h.flush_escape();
    let out = h.render().unwrap_or_default();
    assert!(!out.contains(CLEAR_ALL));
    assert_eq!(h.row(6), "");
    assert_eq!(h.row(7), "");
    assert!(h.handler.specials.is_empty());
}

#[test]
fn escape_sequences_in_messages_are_neutralized() {
    let mut h = Harness::new(20, 10);
    h.render();
    h.session
        .add_message(Role::Assistant, "\x1b[2Jevil\x07", MessageMeta::default());
    let out = h.render().unwrap_or_default();
    assert!(!out.contains(CLEAR_ALL));
    assert_eq!(h.row(2), "< evil");
}
