//! Command suggestion overlay state.

/// Candidate list shown under the input box while a trigger-prefixed buffer is typed.
///
/// Invariant: while visible, `items` is non-empty and `selected < items.len()`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuggestionOverlay {
    items: Vec<String>,
    selected: usize,
    visible: bool,
}

impl SuggestionOverlay {
    /// Show `items`, or hide the overlay when the list is empty.
    ///
    /// The selection survives a refresh that yields the same list; any other
    /// list starts at the first candidate.
    pub fn show(&mut self, items: Vec<String>) {
        if items.is_empty() {
            self.hide();
            return;
        }
        if !(self.visible && self.items == items) {
            self.selected = 0;
        }
        self.items = items;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.items.clear();
        self.selected = 0;
        self.visible = false;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        if self.visible { &self.items } else { &[] }
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.visible.then_some(self.selected)
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&str> {
        self.selected()
            .and_then(|index| self.items.get(index))
            .map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.visible {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if self.visible {
            let len = self.items.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Close the overlay and return the candidate that was selected.
    pub fn accept(&mut self) -> Option<String> {
        if !self.visible {
            return None;
        }
        let chosen = self.items.get(self.selected).cloned();
        self.hide();
        chosen
    }
}
