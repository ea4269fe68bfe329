//! Conversation transcript types
//!
//! A transcript is the ordered, append-only list of turns exchanged with the
//! model. Control turns carry instructions to the model and are never shown
//! back to the user; the `TurnKind` tag is the only way they are told apart.

use serde::{Deserialize, Serialize};

/// Speaker of a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The model asking questions
    Asker,
    /// The human answering (or the engine issuing an instruction)
    Responder,
}

impl Role {
    /// Wire role name used by chat-style APIs
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Asker => "assistant",
            Self::Responder => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    #[default]
    Visible,
    Control,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    #[serde(default)]
    pub kind: TurnKind,
    pub text: String,
}

impl Turn {
    /// A question produced by the model
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            role: Role::Asker,
            kind: TurnKind::Visible,
            text: text.into(),
        }
    }

    /// An answer supplied by the user
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            role: Role::Responder,
            kind: TurnKind::Visible,
            text: text.into(),
        }
    }

    /// An engine-issued instruction sent in the responder slot
    pub fn control(text: impl Into<String>) -> Self {
        Self {
            role: Role::Responder,
            kind: TurnKind::Control,
            text: text.into(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.kind == TurnKind::Visible
    }
}

/// Ordered list of turns
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
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

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of questions asked so far
    pub fn asker_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::Asker).count()
    }

    /// Copy of the turns with one extra trailing turn, for a single request
    pub fn with_trailing(&self, turn: Turn) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.turns.len() + 1);
        turns.extend(self.turns.iter().cloned());
        turns.push(turn);
        turns
    }

    /// Render visible turns as numbered `Qn:` / `A:` lines
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let mut question_no = 0;

        for turn in self.turns.iter().filter(|t| t.is_visible()) {
            match turn.role {
                Role::Asker => {
                    question_no += 1;
                    lines.push(format!("Q{}: {}", question_no, turn.text));
                }
                Role::Responder => {
                    lines.push(format!("A: {}", turn.text));
                    lines.push(String::new());
                }
            }
        }

        lines.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_api_names() {
        assert_eq!(Role::Asker.as_api_str(), "assistant");
        assert_eq!(Role::Responder.as_api_str(), "user");
    }

    #[test]
    fn test_with_trailing_does_not_mutate() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::question("What problem?"));

        let request = transcript.with_trailing(Turn::control("next"));
        assert_eq!(request.len(), 2);
        assert_eq!(transcript.len(), 1);
        assert_eq!(request[1].kind, TurnKind::Control);
    }

    #[test]
    fn test_summary_skips_control_turns() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::control("Q: this looks like a question"));
        transcript.push(Turn::question("Who are the users?"));
        transcript.push(Turn::answer("Nurses"));
        transcript.push(Turn::question("Scale?"));
        transcript.push(Turn::answer("Q: 200 beds"));

        let summary = transcript.summary();
        assert_eq!(
            summary,
            "Q1: Who are the users?\nA: Nurses\n\nQ2: Scale?\nA: Q: 200 beds"
        );
        assert_eq!(transcript.asker_count(), 2);
    }
}
