use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Processing,
    Thinking,
    Waiting,
    Error,
}

impl ProcessingStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "ready",
            Self::Processing => "processing",
            Self::Thinking => "thinking",
            Self::Waiting => "waiting",
            Self::Error => "error",
        }
    }
}

/// Status plus the optional elapsed time reported alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activity {
    pub status: ProcessingStatus,
    pub elapsed: Option<Duration>,
}

/// Presentation switches that do not change layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
}
