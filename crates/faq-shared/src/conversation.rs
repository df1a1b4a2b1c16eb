//! Conversation turns and the per-session history that owns them.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    #[serde(rename = "content")]
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Conversation state for one chat session.
///
/// History is oldest-first. With a retention limit set, pushing past the
/// limit evicts the oldest turns.
#[derive(Debug, Clone, Default)]
pub struct Session {
    history: Vec<ConversationTurn>,
    history_limit: Option<usize>,
}

impl Session {
    /// Session that keeps every turn
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that keeps at most `limit` turns
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: Vec::new(),
            history_limit: Some(limit),
        }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
        if let Some(limit) = self.history_limit {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(ConversationTurn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(ConversationTurn::assistant(text));
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Drop all history (the chat's "clear" action)
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_session_keeps_everything() {
        let mut session = Session::new();
        for i in 0..50 {
            session.push_user(format!("q{}", i));
        }
        assert_eq!(session.len(), 50);
        assert_eq!(session.history()[0].text, "q0");
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut session = Session::with_history_limit(3);
        session.push_user("one");
        session.push_assistant("two");
        session.push_user("three");
        session.push_assistant("four");

        let texts: Vec<&str> = session.history().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three", "four"]);
    }

    #[test]
    fn test_clear() {
        let mut session = Session::with_history_limit(10);
        session.push_user("hello");
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.history_limit(), Some(10));
    }

    #[test]
    fn test_turn_serializes_as_chat_message() {
        let json = serde_json::to_value(ConversationTurn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
