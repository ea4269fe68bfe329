pub mod artifact;
pub mod error;
pub mod project;
pub mod requirement;
pub mod story;
pub mod transcript;
pub mod utils;

pub use artifact::{Artifact, ArtifactKind};
pub use error::{ErrorCategory, ErrorClassifier, LlmError, PlanError, Result, ResultExt};
pub use project::{Project, ProjectSummary, Topic};
pub use requirement::{Requirement, RequirementCategory, RequirementSet, format_requirements};
pub use story::{Priority, UserStory, render_stories};
pub use transcript::{Role, Transcript, Turn, TurnKind};
pub use utils::{ParseWithDefault, log_filter_error, preview};

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

/// Type-safe wrapper for session IDs
///
/// Prevents accidental mixing of session IDs with other string types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod newtype_tests {
    use super::*;

    #[test]
    fn test_session_id() {
        let id = SessionId::new("sess-123");
        assert_eq!(id.as_str(), "sess-123");
        assert_eq!(format!("{}", id), "sess-123");
    }

    #[test]
    fn test_session_id_generate_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
