//! Submitted-line history with Up/Down recall.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::NonEmptyString;

/// Maximum number of submitted lines kept; the oldest is evicted first.
pub const HISTORY_CAPACITY: usize = 100;

/// `Idle` means the user is editing a fresh draft.
/// `Browsing` means an entry is shown and the draft is stashed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum NavState {
    #[default]
    Idle,
    Browsing {
        index: usize,
        stash: String,
    },
}

/// Result of a navigation attempt: either the buffer should show `text`, or
/// we're already at the boundary (oldest entry, or not browsing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Moved(String),
    AtBoundary,
}

/// Direction of a history step. `Back` is `navigate(-1)`, `Forward` is `navigate(+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Back,
    Forward,
}

/// Bounded, most-recent-last list of submitted lines.
///
/// # Navigation Behavior
///
/// Back:
/// 1. If not browsing, stash the current draft and show the most recent entry
/// 2. If already browsing, show the next older entry
///
/// Forward:
/// 1. If at the newest entry, stop browsing and restore the stashed draft
/// 2. Otherwise, show the next newer entry
///
/// Browsing is reset on every submission.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InputHistory {
    entries: VecDeque<String>,
    #[serde(skip)]
    nav: NavState,
}

impl InputHistory {
    /// Record a submission. A repeat of the most recent entry is stored once.
    pub fn push(&mut self, text: NonEmptyString) {
        self.reset_navigation();
        if self.entries.back().is_some_and(|last| last == text.as_str()) {
            return;
        }
        self.entries.push_back(text.into_inner());
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn navigate(&mut self, step: HistoryStep, current: &str) -> NavOutcome {
        match step {
            HistoryStep::Back => self.back(current),
            HistoryStep::Forward => self.forward(),
        }
    }

    fn back(&mut self, current: &str) -> NavOutcome {
        match &mut self.nav {
            NavState::Idle => match self.entries.len().checked_sub(1) {
                None => NavOutcome::AtBoundary,
                Some(last) => {
                    self.nav = NavState::Browsing {
                        index: last,
                        stash: current.to_owned(),
                    };
                    NavOutcome::Moved(self.entries[last].clone())
                }
            },
            NavState::Browsing { index: 0, .. } => NavOutcome::AtBoundary,
            NavState::Browsing { index, .. } => {
                *index -= 1;
                NavOutcome::Moved(self.entries[*index].clone())
            }
        }
    }

    fn forward(&mut self) -> NavOutcome {
        match &mut self.nav {
            NavState::Idle => NavOutcome::AtBoundary,
            NavState::Browsing { index, stash } if *index + 1 >= self.entries.len() => {
                let stash = std::mem::take(stash);
                self.nav = NavState::Idle;
                NavOutcome::Moved(stash)
            }
            NavState::Browsing { index, .. } => {
                *index += 1;
                NavOutcome::Moved(self.entries[*index].clone())
            }
        }
    }

    pub fn reset_navigation(&mut self) {
        self.nav = NavState::Idle;
    }

    /// Index of the entry being shown, `None` when not browsing.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.nav {
            NavState::Idle => None,
            NavState::Browsing { index, .. } => Some(index),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
