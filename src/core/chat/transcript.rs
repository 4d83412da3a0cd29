//! Conversation transcript: ordered, append-only turns.

use std::fmt;

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role label expected by the chat completions endpoint.
    pub fn api_role(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One message. Fields are private: a turn cannot change once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Turns in submission order. Only appends and a full reset are possible.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn push_user(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Turn::new(Role::User, text))
    }

    pub fn push_model(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Turn::new(Role::Model, text))
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Text of the most recent model turn.
    pub fn last_model_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Model)
            .map(|t| t.text.as_str())
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_keep_submission_order() {
        let mut t = Transcript::default();
        t.push_user("one");
        t.push_model("two");
        t.push_user("three");
        let texts: Vec<&str> = t.turns().iter().map(Turn::text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(t.turns()[1].role(), Role::Model);
    }

    #[test]
    fn last_model_text_skips_user_turns() {
        let mut t = Transcript::default();
        assert_eq!(t.last_model_text(), None);
        t.push_user("q1");
        t.push_model("a1");
        t.push_user("q2");
        assert_eq!(t.last_model_text(), Some("a1"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = Transcript::default();
        t.push_user("q");
        t.reset();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn api_roles() {
        assert_eq!(Role::User.api_role(), "user");
        assert_eq!(Role::Model.api_role(), "assistant");
        assert_eq!(Role::Model.to_string(), "model");
    }
}
