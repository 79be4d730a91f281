//! Chat transcript entries.
//!
//! Messages are delivered by external event sources and never mutated after
//! creation. Constructors take `SystemTime` explicitly; callers own the clock.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
    System,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
            Role::System => "system",
        }
    }
}

/// Monotonic per-session message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Unified-diff style text attached to a tool message or confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPayload(String);

impl DiffPayload {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

/// Optional labels carried alongside message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub diff: Option<DiffPayload>,
}

impl MessageMeta {
    #[must_use]
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            tool_name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_file(mut self, label: impl Into<String>) -> Self {
        self.file_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_diff(mut self, diff: DiffPayload) -> Self {
        self.diff = Some(diff);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    role: Role,
    content: String,
    #[serde(flatten)]
    meta: MessageMeta,
    timestamp: SystemTime,
}

impl ChatMessage {
    #[must_use]
    pub fn new(
        id: MessageId,
        role: Role,
        content: impl Into<String>,
        meta: MessageMeta,
        timestamp: SystemTime,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            meta,
            timestamp,
        }
    }

    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.meta.tool_name.as_deref()
    }

    #[must_use]
    pub fn file_label(&self) -> Option<&str> {
        self.meta.file_label.as_deref()
    }

    #[must_use]
    pub fn diff(&self) -> Option<&DiffPayload> {
        self.meta.diff.as_ref()
    }

    #[must_use]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Whether `role`/`content`/`tool_name` describe the same delivery as this entry.
    ///
    /// Id, timestamp, file label and diff payload do not participate.
    #[must_use]
    pub fn is_duplicate_of(&self, role: Role, content: &str, tool_name: Option<&str>) -> bool {
        self.role == role && self.content == content && self.tool_name() == tool_name
    }
}
