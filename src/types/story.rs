//! User story records decoded from model output

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Models vary the casing ("high", "HIGH"); anything else is rejected.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["High", "Medium", "Low"],
            )),
        }
    }
}

/// Accepts `5` or `"5"` and stores the text form
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for story_points, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub user_story: String,
    pub description: String,
    pub priority: Priority,
    #[serde(deserialize_with = "string_or_number")]
    pub story_points: String,
    pub epic: String,
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

const STORY_SEPARATOR_WIDTH: usize = 80;

impl UserStory {
    /// Plain-text rendering stored as the artifact content
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("ID: {}\n", self.id));
        out.push_str(&format!("Title: {}\n", self.title));
        out.push_str(&format!("Epic: {}\n", self.epic));
        out.push_str(&format!("Priority: {}\n", self.priority));
        out.push_str(&format!("Story Points: {}\n\n", self.story_points));
        out.push_str(&format!("User Story:\n{}\n\n", self.user_story));
        out.push_str(&format!("Description:\n{}\n\n", self.description));
        out.push_str("Acceptance Criteria:\n");
        for (i, criterion) in self.acceptance_criteria.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, criterion));
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            out.push_str(&format!("\nNotes:\n{}\n", notes));
        }
        out
    }
}

/// Render a list of stories separated by rule lines
pub fn render_stories(stories: &[UserStory]) -> String {
    let separator = format!("\n{}\n\n", "=".repeat(STORY_SEPARATOR_WIDTH));
    stories
        .iter()
        .map(UserStory::render)
        .collect::<Vec<_>>()
        .join(&separator)
}
