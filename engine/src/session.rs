//! The session: line editor, render state and redraw scheduling in one owner.

use std::time::{Duration, Instant, SystemTime};

use weft_config::WeftConfig;
use weft_types::ui::{
    ConfirmationDialog, EnterOutcome, HistoryStep, LineBuffer, LineEditor, ProcessingStatus,
};
use weft_types::{MessageId, MessageMeta, Role};

use crate::commands::CommandRegistry;
use crate::handler::{SessionHandler, SuggestionSource};
use crate::key::{Key, SpecialKey};
use crate::render_state::{InputView, RenderState};
use crate::scheduler::RedrawScheduler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub model: String,
    pub debounce: Duration,
    pub trigger_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&WeftConfig::default())
    }
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(config: &WeftConfig) -> Self {
        Self {
            model: config.model().to_owned(),
            debounce: config.ui.debounce(),
            trigger_prefix: config.ui.trigger_prefix.clone(),
        }
    }
}

/// How the next frame must be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Rewrite changed content over the previous frame.
    Diff,
    /// Clear the screen first.
    Full,
}

pub struct Session {
    editor: LineEditor,
    state: RenderState,
    scheduler: RedrawScheduler,
    source: Box<dyn SuggestionSource + Send>,
    trigger_prefix: String,
    full_redraw: bool,
    release_requested: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("editor", &self.editor)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("trigger_prefix", &self.trigger_prefix)
            .field("full_redraw", &self.full_redraw)
            .field("release_requested", &self.release_requested)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session backed by the built-in command table.
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        let registry = CommandRegistry::builtin(options.trigger_prefix.clone());
        Self::with_source(options, registry)
    }

    /// The first frame is always a full redraw and is scheduled immediately.
    #[must_use]
    pub fn with_source(options: SessionOptions, source: impl SuggestionSource + Send + 'static) -> Self {
        let mut scheduler = RedrawScheduler::new(options.debounce);
        scheduler.request(Instant::now());
        Self {
            editor: LineEditor::default(),
            state: RenderState::new(options.model),
            scheduler,
            source: Box::new(source),
            trigger_prefix: options.trigger_prefix,
            full_redraw: true,
            release_requested: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    #[must_use]
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    // ------------------------------------------------------------------
    // Redraw scheduling
    // ------------------------------------------------------------------

    #[must_use]
    pub fn redraw_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Returns the pending redraw once its debounce deadline has passed.
    pub fn poll_redraw(&mut self, now: Instant) -> Option<Redraw> {
        if !self.scheduler.poll(now) {
            return None;
        }
        if std::mem::take(&mut self.full_redraw) {
            Some(Redraw::Full)
        } else {
            Some(Redraw::Diff)
        }
    }

    pub fn request_full_redraw(&mut self) {
        self.full_redraw = true;
        self.mark_dirty();
    }

    /// A resize was reported. The next frame clears the screen even when the
    /// final size matches the previous one, since the terminal may have
    /// reflowed what was on it.
    pub fn notify_resize(&mut self) {
        self.request_full_redraw();
    }

    fn mark_dirty(&mut self) {
        self.scheduler.request(Instant::now());
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Returns `None` when an equal (role, content, tool name) message exists.
    pub fn add_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        meta: MessageMeta,
    ) -> Option<MessageId> {
        let id = self
            .state
            .push_message(role, content.into(), meta, SystemTime::now());
        match id {
            Some(id) => {
                self.mark_dirty();
                Some(id)
            }
            None => {
                tracing::debug!(role = role.as_str(), "dropped duplicate message");
                None
            }
        }
    }

    pub fn clear_messages(&mut self) {
        self.state.clear_messages();
        self.mark_dirty();
    }

    pub fn set_processing(&mut self, status: ProcessingStatus, elapsed: Option<Duration>) {
        self.state.set_activity(status, elapsed);
        self.mark_dirty();
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.state.set_model(model.into());
        self.mark_dirty();
    }

    pub fn set_active_file(&mut self, file: Option<String>) {
        self.state.set_active_file(file);
        self.mark_dirty();
    }

    pub fn set_mcp_status(&mut self, status: Option<String>) {
        self.state.set_mcp_status(status);
        self.mark_dirty();
    }

    pub fn set_token_count(&mut self, count: Option<u64>) {
        self.state.set_token_count(count);
        self.mark_dirty();
    }

    pub fn set_auto_edit(&mut self, enabled: bool) {
        self.state.set_auto_edit(enabled);
        self.mark_dirty();
    }

    /// Replaces any dialog already open.
    pub fn show_confirmation(&mut self, dialog: ConfirmationDialog) {
        self.state.set_dialog(Some(dialog));
        self.mark_dirty();
    }

    pub fn hide_confirmation(&mut self) {
        self.state.set_dialog(None);
        self.mark_dirty();
    }

    pub fn show_suggestions(&mut self, items: Vec<String>) {
        self.editor.suggestions_mut().show(items);
        self.sync_input();
    }

    pub fn hide_suggestions(&mut self) {
        self.editor.suggestions_mut().hide();
        self.sync_input();
    }

    /// Ask the host to hand the terminal back (leave raw mode).
    pub fn request_release(&mut self) {
        self.release_requested = true;
    }

    #[must_use]
    pub fn release_requested(&self) -> bool {
        self.release_requested
    }

    // ------------------------------------------------------------------
    // Key routing
    // ------------------------------------------------------------------

    pub fn handle_key<H: SessionHandler + ?Sized>(&mut self, key: Key, handler: &mut H) {
        match key {
            Key::Interrupt => {
                handler.on_special_key(self, SpecialKey::Interrupt);
                return;
            }
            Key::Redraw => {
                self.request_full_redraw();
                handler.on_special_key(self, SpecialKey::Redraw);
                return;
            }
            _ => {}
        }

        if self.state.dialog().is_some() {
            self.handle_dialog_key(key, handler);
            return;
        }
        if self.editor.suggestions().is_visible() && self.handle_overlay_key(key) {
            return;
        }
        self.handle_edit_key(key, handler);
    }

    fn handle_dialog_key<H: SessionHandler + ?Sized>(&mut self, key: Key, handler: &mut H) {
        match key {
            Key::Up | Key::HistoryPrev => {
                if let Some(dialog) = self.state.dialog_mut() {
                    dialog.select_prev();
                }
                self.mark_dirty();
            }
            Key::Down | Key::HistoryNext | Key::Tab => {
                if let Some(dialog) = self.state.dialog_mut() {
                    dialog.select_next();
                }
                self.mark_dirty();
            }
            Key::Char(digit @ '1'..='9') => {
                let index = digit.to_digit(10).map_or(0, |d| d as usize - 1);
                let picked = self
                    .state
                    .dialog_mut()
                    .is_some_and(|dialog| dialog.select(index));
                if picked {
                    self.resolve_dialog(handler);
                }
            }
            Key::Enter => self.resolve_dialog(handler),
            Key::Escape => {
                self.hide_confirmation();
                handler.on_special_key(self, SpecialKey::Cancel);
            }
            _ => {}
        }
    }

    fn resolve_dialog<H: SessionHandler + ?Sized>(&mut self, handler: &mut H) {
        let Some(dialog) = self.state.take_dialog() else {
            return;
        };
        self.mark_dirty();
        let choice = dialog.selected_option().to_owned();
        tracing::debug!(title = dialog.title(), %choice, "dialog answered");
        handler.on_completed_line(self, &choice);
    }

    /// Returns false for keys the overlay does not consume.
    fn handle_overlay_key(&mut self, key: Key) -> bool {
        match key {
            Key::Up => self.editor.suggestions_mut().select_prev(),
            Key::Down => self.editor.suggestions_mut().select_next(),
            Key::Tab | Key::Enter => {
                if let Some(choice) = self.editor.suggestions_mut().accept() {
                    self.editor.replace(choice);
                }
            }
            Key::Escape => self.editor.suggestions_mut().hide(),
            _ => return false,
        }
        self.sync_input();
        true
    }

    fn handle_edit_key<H: SessionHandler + ?Sized>(&mut self, key: Key, handler: &mut H) {
        match key {
            Key::Char(c) => self.edit(|buf| buf.insert_char(c)),
            Key::Backspace => self.edit(LineBuffer::backspace),
            Key::Delete => self.edit(LineBuffer::delete_forward),
            Key::DeleteWordBackward => self.edit(LineBuffer::delete_word_backward),
            Key::KillToLineEnd => self.edit(LineBuffer::delete_to_line_end),
            Key::KillToLineStart => self.edit(LineBuffer::delete_to_line_start),
            Key::Left => self.move_cursor(|buf| buf.move_cursor(-1)),
            Key::Right => self.move_cursor(|buf| buf.move_cursor(1)),
            Key::LineStart => self.move_cursor(LineBuffer::move_to_line_start),
            Key::LineEnd => self.move_cursor(LineBuffer::move_to_line_end),
            Key::WordLeft => self.move_cursor(LineBuffer::move_word_backward),
            Key::WordRight => self.move_cursor(LineBuffer::move_word_forward),
            Key::Up | Key::HistoryPrev => self.navigate_history(HistoryStep::Back),
            Key::Down | Key::HistoryNext => self.navigate_history(HistoryStep::Forward),
            Key::Newline => {
                self.editor.insert_newline();
                self.refresh_suggestions();
                self.sync_input();
            }
            Key::Enter => self.enter(handler),
            Key::BackTab => {
                let enabled = !self.state.auto_edit();
                self.set_auto_edit(enabled);
                handler.on_special_key(self, SpecialKey::Toggle);
            }
            Key::Escape => {
                self.set_processing(ProcessingStatus::Idle, None);
                handler.on_special_key(self, SpecialKey::Cancel);
            }
            // Tab without an overlay, and keys already routed above.
            Key::Tab | Key::Interrupt | Key::Redraw => {}
        }
    }

    fn enter<H: SessionHandler + ?Sized>(&mut self, handler: &mut H) {
        match self.editor.enter() {
            EnterOutcome::Continued => {
                self.refresh_suggestions();
                self.sync_input();
            }
            EnterOutcome::Discarded => self.sync_input(),
            EnterOutcome::Submitted(line) => {
                self.sync_input();
                tracing::debug!(chars = line.as_str().chars().count(), "line submitted");
                handler.on_completed_line(self, line.as_str());
            }
        }
    }

    /// Submit one complete line from line-buffered input.
    ///
    /// The line is already final, so the continuation heuristic and the
    /// overlay do not apply. With a dialog open the line picks an option by
    /// number or label; an empty line confirms the current selection.
    pub fn submit_line<H: SessionHandler + ?Sized>(&mut self, line: &str, handler: &mut H) {
        if self.state.dialog().is_some() {
            let answer = line.trim();
            let picked = self
                .state
                .dialog_mut()
                .is_some_and(|dialog| pick_option(dialog, answer));
            if picked || answer.is_empty() {
                self.resolve_dialog(handler);
            } else {
                tracing::debug!(answer, "no dialog option matches");
            }
            return;
        }

        self.editor.replace(line);
        match self.editor.submit() {
            EnterOutcome::Submitted(line) => {
                self.sync_input();
                handler.on_completed_line(self, line.as_str());
            }
            EnterOutcome::Continued | EnterOutcome::Discarded => self.sync_input(),
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut LineBuffer)) {
        self.editor.edit(apply);
        self.refresh_suggestions();
        self.sync_input();
    }

    fn move_cursor(&mut self, apply: impl FnOnce(&mut LineBuffer)) {
        self.editor.edit(apply);
        self.sync_input();
    }

    fn navigate_history(&mut self, step: HistoryStep) {
        if self.editor.navigate_history(step) {
            self.sync_input();
        }
    }

    /// Re-query the source for the current buffer. A lone candidate equal to
    /// the buffer is not shown, so Enter submits it.
    fn refresh_suggestions(&mut self) {
        let text = self.editor.buffer().text();
        let mut items = if text.starts_with(self.trigger_prefix.as_str()) {
            self.source.suggestions(text)
        } else {
            Vec::new()
        };
        if let [only] = items.as_slice()
            && only.to_lowercase() == text.to_lowercase()
        {
            items.clear();
        }
        self.editor.suggestions_mut().show(items);
    }

    fn sync_input(&mut self) {
        let buffer = self.editor.buffer();
        self.state.set_input(InputView {
            text: buffer.text().to_owned(),
            cursor: buffer.cursor(),
            multiline: self.editor.is_multiline(),
        });
        self.state
            .set_suggestions(self.editor.suggestions().clone());
        self.mark_dirty();
    }
}

/// Select the option named by a 1-based number or a case-insensitive label.
fn pick_option(dialog: &mut ConfirmationDialog, answer: &str) -> bool {
    if let Ok(number) = answer.parse::<usize>() {
        return number >= 1 && dialog.select(number - 1);
    }
    dialog
        .options()
        .iter()
        .position(|option| option.eq_ignore_ascii_case(answer))
        .is_some_and(|index| dialog.select(index))
}
