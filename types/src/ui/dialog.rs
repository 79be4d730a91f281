//! Confirmation dialog shown on behalf of an external policy decision.

use crate::DiffPayload;

const FALLBACK_OPTION: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDialog {
    title: String,
    message: String,
    diff: Option<DiffPayload>,
    options: Vec<String>,
    selected: usize,
}

impl ConfirmationDialog {
    /// An empty option list is replaced by a single "OK" so a dialog can always be answered.
    #[must_use]
    pub fn new<I, S>(title: impl Into<String>, message: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            options.push(FALLBACK_OPTION.to_owned());
        }
        Self {
            title: title.into(),
            message: message.into(),
            diff: None,
            options,
            selected: 0,
        }
    }

    #[must_use]
    pub fn with_diff(mut self, diff: DiffPayload) -> Self {
        self.diff = Some(diff);
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn diff(&self) -> Option<&DiffPayload> {
        self.diff.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_option(&self) -> &str {
        &self.options[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub fn select_prev(&mut self) {
        let len = self.options.len();
        self.selected = (self.selected + len - 1) % len;
    }

    /// Returns false (and keeps the selection) when `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }
}
