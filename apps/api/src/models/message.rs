use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only interview log.
///
/// Either empty (before setup) or a single system message followed by
/// user/assistant pairs. The only mutators are `seeded` and `push_exchange`,
/// so the system message is always at index 0 and never repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn seeded(system_prompt: impl Into<String>) -> Self {
        Transcript(vec![Message::system(system_prompt)])
    }

    /// Appends one answered turn. Callers only commit a pair once the
    /// assistant reply exists, so no user message is left unanswered.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        debug_assert!(!self.is_empty(), "transcript must be seeded first");
        self.0.push(Message::user(user));
        self.0.push(Message::assistant(assistant));
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// Messages shown to the candidate: everything except the system instruction.
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        self.0.iter().filter(|m| m.role != Role::System)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
