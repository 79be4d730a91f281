//! Snapshot of everything the terminal shows.

use std::time::{Duration, SystemTime};

use weft_types::ui::{Activity, ConfirmationDialog, ProcessingStatus, SuggestionOverlay};
use weft_types::{ChatMessage, MessageId, MessageMeta, Role};

/// The input box as the renderer sees it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputView {
    pub text: String,
    /// Grapheme offset into `text`.
    pub cursor: usize,
    pub multiline: bool,
}

/// Everything visible, owned by [`crate::Session`].
///
/// Only the session mutates this; every mutation schedules a redraw.
#[derive(Debug, Clone)]
pub struct RenderState {
    messages: Vec<ChatMessage>,
    next_message_id: u64,
    input: InputView,
    activity: Activity,
    auto_edit: bool,
    model: String,
    active_file: Option<String>,
    mcp_status: Option<String>,
    token_count: Option<u64>,
    dialog: Option<ConfirmationDialog>,
    suggestions: SuggestionOverlay,
}

impl RenderState {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            next_message_id: 1,
            input: InputView::default(),
            activity: Activity::default(),
            auto_edit: false,
            model: model.into(),
            active_file: None,
            mcp_status: None,
            token_count: None,
            dialog: None,
            suggestions: SuggestionOverlay::default(),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn input(&self) -> &InputView {
        &self.input
    }

    #[must_use]
    pub fn activity(&self) -> Activity {
        self.activity
    }

    #[must_use]
    pub fn status(&self) -> ProcessingStatus {
        self.activity.status
    }

    #[must_use]
    pub fn auto_edit(&self) -> bool {
        self.auto_edit
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    #[must_use]
    pub fn mcp_status(&self) -> Option<&str> {
        self.mcp_status.as_deref()
    }

    #[must_use]
    pub fn token_count(&self) -> Option<u64> {
        self.token_count
    }

    #[must_use]
    pub fn dialog(&self) -> Option<&ConfirmationDialog> {
        self.dialog.as_ref()
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionOverlay {
        &self.suggestions
    }

    /// Append unless an equal (role, content, tool name) entry already exists.
    pub(crate) fn push_message(
        &mut self,
        role: Role,
        content: String,
        meta: MessageMeta,
        timestamp: SystemTime,
    ) -> Option<MessageId> {
        let tool = meta.tool_name.as_deref();
        if self
            .messages
            .iter()
            .any(|existing| existing.is_duplicate_of(role, &content, tool))
        {
            return None;
        }
        let id = MessageId::new(self.next_message_id);
        self.next_message_id += 1;
        self.messages
            .push(ChatMessage::new(id, role, content, meta, timestamp));
        Some(id)
    }

    pub(crate) fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub(crate) fn set_input(&mut self, input: InputView) {
        self.input = input;
    }

    pub(crate) fn set_activity(&mut self, status: ProcessingStatus, elapsed: Option<Duration>) {
        self.activity = Activity { status, elapsed };
    }

    pub(crate) fn set_auto_edit(&mut self, enabled: bool) {
        self.auto_edit = enabled;
    }

    pub(crate) fn set_model(&mut self, model: String) {
        self.model = model;
    }

    pub(crate) fn set_active_file(&mut self, file: Option<String>) {
        self.active_file = file;
    }

    pub(crate) fn set_mcp_status(&mut self, status: Option<String>) {
        self.mcp_status = status;
    }

    pub(crate) fn set_token_count(&mut self, count: Option<u64>) {
        self.token_count = count;
    }

    pub(crate) fn set_dialog(&mut self, dialog: Option<ConfirmationDialog>) {
        self.dialog = dialog;
    }

    pub(crate) fn take_dialog(&mut self) -> Option<ConfirmationDialog> {
        self.dialog.take()
    }

    pub(crate) fn dialog_mut(&mut self) -> Option<&mut ConfirmationDialog> {
        self.dialog.as_mut()
    }

    pub(crate) fn set_suggestions(&mut self, overlay: SuggestionOverlay) {
        self.suggestions = overlay;
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use weft_types::{MessageMeta, Role};

    use super::RenderState;

    #[test]
    fn duplicate_triple_is_dropped() {
        let mut state = RenderState::new("m");
        let now = SystemTime::now();
        assert!(
            state
                .push_message(Role::Assistant, "hi".into(), MessageMeta::default(), now)
                .is_some()
        );
        assert!(
            state
                .push_message(Role::Assistant, "hi".into(), MessageMeta::default(), now)
                .is_none()
        );
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn same_content_different_role_or_tool_is_kept() {
        let mut state = RenderState::new("m");
        let now = SystemTime::now();
        state.push_message(Role::User, "ls".into(), MessageMeta::default(), now);
        state.push_message(Role::Assistant, "ls".into(), MessageMeta::default(), now);
        state.push_message(Role::Tool, "ls".into(), MessageMeta::tool("shell"), now);
        state.push_message(Role::Tool, "ls".into(), MessageMeta::tool("grep"), now);
        assert_eq!(state.messages().len(), 4);
    }

    #[test]
    fn ids_increase_and_survive_clear() {
        let mut state = RenderState::new("m");
        let now = SystemTime::now();
        let first = state
            .push_message(Role::User, "a".into(), MessageMeta::default(), now)
            .unwrap();
        state.clear_messages();
        let second = state
            .push_message(Role::User, "a".into(), MessageMeta::default(), now)
            .unwrap();
        assert!(second.get() > first.get());
    }
}
