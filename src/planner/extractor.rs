//! Structured Extractor
//!
//! Asks the model for one JSON utterance and decodes it tolerantly. Decode
//! failures never surface as errors: the `*_outcome` methods return the raw
//! [`DecodeOutcome`], the plain methods fall back to an empty value and log
//! the raw text. Only gateway errors are returned as `Err`.

use tracing::{debug, info, warn};

use super::prompts::{DesignPrompts, ElicitationPrompts};
use super::session::SessionSnapshot;
use crate::ai::{ChatRequest, DecodeOutcome, PromptBuilder, SharedProvider, decode};
use crate::config::ElicitationConfig;
use crate::constants::generation::USER_STORIES_MAX_TOKENS;
use crate::types::{
    ArtifactKind, Requirement, RequirementSet, Result, Topic, Turn, UserStory,
    format_requirements, preview,
};

const RAW_PREVIEW_CHARS: usize = 500;

pub struct Extractor {
    provider: SharedProvider,
    max_tokens: u32,
    temperature: f32,
}

impl Extractor {
    pub fn new(provider: SharedProvider, config: &ElicitationConfig) -> Self {
        Self {
            provider,
            max_tokens: config.extraction_max_tokens,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Categorized requirements from a finished conversation.
    ///
    /// Falls back to the all-empty set when the reply cannot be decoded.
    pub async fn extract_requirements(&self, snapshot: &SessionSnapshot) -> Result<RequirementSet> {
        let set = match self.extract_requirements_outcome(snapshot).await? {
            DecodeOutcome::Decoded(set) => set,
            DecodeOutcome::Failed { raw, reason } => {
                warn!(
                    "Could not decode requirements ({}); raw reply: {}",
                    reason,
                    preview(&raw, RAW_PREVIEW_CHARS)
                );
                RequirementSet::default()
            }
        };

        info!(
            functional = set.functional.len(),
            non_functional = set.non_functional.len(),
            constraints = set.constraints.len(),
            "Requirements extracted"
        );
        Ok(set)
    }

    pub async fn extract_requirements_outcome(
        &self,
        snapshot: &SessionSnapshot,
    ) -> Result<DecodeOutcome<RequirementSet>> {
        let request = ChatRequest::new(
            snapshot.system.clone(),
            snapshot
                .transcript
                .with_trailing(Turn::control(ElicitationPrompts::extraction())),
            self.max_tokens,
        )
        .with_temperature(self.temperature);

        debug!(
            turns = snapshot.transcript.len(),
            provider = self.provider.name(),
            "Requesting requirement extraction"
        );

        let response = self.provider.send(&request).await?;
        Ok(decode(&response.content))
    }

    /// User stories for `topic`, or an empty list when the reply cannot be
    /// decoded.
    pub async fn extract_user_stories(
        &self,
        topic: &Topic,
        requirements: &[Requirement],
    ) -> Result<Vec<UserStory>> {
        match self.extract_user_stories_outcome(topic, requirements).await? {
            DecodeOutcome::Decoded(stories) => {
                info!(count = stories.len(), "User stories extracted");
                Ok(stories)
            }
            DecodeOutcome::Failed { raw, reason } => {
                warn!(
                    "Could not decode user stories ({}); raw reply: {}",
                    reason,
                    preview(&raw, RAW_PREVIEW_CHARS)
                );
                Ok(Vec::new())
            }
        }
    }

    pub async fn extract_user_stories_outcome(
        &self,
        topic: &Topic,
        requirements: &[Requirement],
    ) -> Result<DecodeOutcome<Vec<UserStory>>> {
        let request = user_stories_request(topic, requirements).with_temperature(self.temperature);

        debug!(
            requirements = requirements.len(),
            provider = self.provider.name(),
            "Requesting user stories"
        );

        let response = self.provider.send(&request).await?;
        Ok(decode(&response.content))
    }
}

/// Generation request shared by every artifact kind
pub(crate) fn artifact_request(
    kind: ArtifactKind,
    topic: &Topic,
    requirements: &[Requirement],
    max_tokens: u32,
) -> ChatRequest {
    let prompt = PromptBuilder::new()
        .text(DesignPrompts::lead(kind))
        .context_item("PROJECT", &topic.name)
        .context_item("DESCRIPTION", &topic.description)
        .text(&format_requirements(requirements))
        .numbered("Provide:", DesignPrompts::deliverables(kind))
        .text(DesignPrompts::closing(kind))
        .build();

    ChatRequest::single(DesignPrompts::system(kind), prompt, max_tokens)
}

fn user_stories_request(topic: &Topic, requirements: &[Requirement]) -> ChatRequest {
    artifact_request(
        ArtifactKind::UserStories,
        topic,
        requirements,
        USER_STORIES_MAX_TOKENS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::scripted::ScriptedProvider;
    use crate::types::{ErrorCategory, LlmError, PlanError, Priority, RequirementCategory, Transcript};
    use chrono::Utc;
    use std::sync::Arc;

    fn snapshot() -> SessionSnapshot {
        let mut transcript = Transcript::new();
        transcript.push(Turn::question("Who uses it?"));
        transcript.push(Turn::answer("Nurses"));
        SessionSnapshot {
            topic: Topic::new("Ward Tracker", "Hospital bed management"),
            system: "system".to_string(),
            transcript,
        }
    }

    fn extractor(provider: &Arc<ScriptedProvider>) -> Extractor {
        Extractor::new(provider.clone(), &ElicitationConfig::default())
    }

    fn requirement(category: RequirementCategory, description: &str) -> Requirement {
        Requirement {
            id: 1,
            project_id: 1,
            category,
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }

    const STORIES: &str = r#"[
        {"id": "US-001", "title": "Sign in", "user_story": "As a nurse, I want to sign in so that I see my ward",
         "description": "Badge login", "priority": "High", "story_points": "3", "epic": "Access",
         "acceptance_criteria": ["Given a badge, when scanned, then signed in"], "notes": "SSO later"},
        {"id": "US-002", "title": "Assign bed", "user_story": "As a nurse, I want to assign a bed so that patients are placed",
         "description": "Pick a free bed", "priority": "medium", "story_points": 5, "epic": "Beds",
         "acceptance_criteria": ["Given a free bed, when assigned, then it is occupied"]},
        {"id": "US-003", "title": "Discharge", "user_story": "As a nurse, I want to discharge so that beds free up",
         "description": "Release bed", "priority": "Low", "story_points": "2", "epic": "Beds",
         "acceptance_criteria": []}
    ]"#;

    #[tokio::test]
    async fn test_fenced_json_decodes() {
        let reply = "```json\n{\"functional\":[\"F1\"],\"non_functional\":[],\"constraints\":[\"C1\"]}\n```";
        let provider = Arc::new(ScriptedProvider::new().with_reply(reply));

        let set = extractor(&provider).extract_requirements(&snapshot()).await.unwrap();

        assert_eq!(set.functional, vec!["F1"]);
        assert!(set.non_functional.is_empty());
        assert_eq!(set.constraints, vec!["C1"]);
    }

    #[tokio::test]
    async fn test_garbage_yields_empty_set() {
        let provider = Arc::new(ScriptedProvider::new().with_reply("I'm sorry, I can't"));

        let set = extractor(&provider).extract_requirements(&snapshot()).await.unwrap();
        assert_eq!(set, RequirementSet::default());
    }

    #[tokio::test]
    async fn test_outcome_keeps_raw_text() {
        let provider = Arc::new(ScriptedProvider::new().with_reply("not json"));

        let outcome = extractor(&provider)
            .extract_requirements_outcome(&snapshot())
            .await
            .unwrap();
        match outcome {
            DecodeOutcome::Failed { raw, .. } => assert_eq!(raw, "not json"),
            DecodeOutcome::Decoded(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_extraction_request_shape() {
        let provider = Arc::new(ScriptedProvider::repeating("{}"));
        extractor(&provider)
            .extract_requirements(&snapshot())
            .await
            .unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(request.system, "system");
        assert_eq!(request.max_tokens, 2000);
        assert_eq!(request.messages.len(), 3);
        assert!(!request.messages[2].is_visible());
        assert!(request.messages[2].text.contains("\"non_functional\""));
    }

    #[tokio::test]
    async fn test_gateway_error_is_returned() {
        let provider = Arc::new(
            ScriptedProvider::new().with_error(LlmError::new(ErrorCategory::Auth, "bad key")),
        );

        let err = extractor(&provider)
            .extract_requirements(&snapshot())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Llm(_)));
        assert_eq!(err.category(), Some(ErrorCategory::Auth));
    }

    #[tokio::test]
    async fn test_three_stories_decode() {
        let provider = Arc::new(ScriptedProvider::new().with_reply(STORIES));
        let topic = Topic::new("Ward Tracker", "Hospital bed management");
        let reqs = [requirement(RequirementCategory::Functional, "Assign beds")];

        let stories = extractor(&provider)
            .extract_user_stories(&topic, &reqs)
            .await
            .unwrap();

        assert_eq!(stories.len(), 3);
        assert_eq!(stories[1].priority, Priority::Medium);
        assert_eq!(stories[1].story_points, "5");
        assert_eq!(stories[0].notes.as_deref(), Some("SSO later"));

        let request = provider.last_request().unwrap();
        assert_eq!(request.max_tokens, USER_STORIES_MAX_TOKENS);
        assert!(request.messages[0].text.contains("1. Assign beds"));
    }

    #[tokio::test]
    async fn test_malformed_stories_yield_empty() {
        let provider = Arc::new(ScriptedProvider::new().with_reply("[{\"id\": \"US-001\"}"));
        let topic = Topic::new("p", "d");
        let reqs = [requirement(RequirementCategory::Functional, "x")];

        let stories = extractor(&provider)
            .extract_user_stories(&topic, &reqs)
            .await
            .unwrap();
        assert!(stories.is_empty());
    }

    #[test]
    fn test_artifact_request_is_deterministic() {
        let topic = Topic::new("p", "d");
        let reqs = [
            requirement(RequirementCategory::Constraint, "On-premise"),
            requirement(RequirementCategory::Functional, "Track beds"),
        ];
        let a = artifact_request(ArtifactKind::DataModel, &topic, &reqs, 4000);
        let b = artifact_request(ArtifactKind::DataModel, &topic, &reqs, 4000);
        assert_eq!(a, b);

        let text = &a.messages[0].text;
        assert!(text.starts_with("Design a data model for:"));
        assert!(text.contains("PROJECT: p\nDESCRIPTION: d"));
        assert!(text.contains("FUNCTIONAL REQUIREMENTS:\n1. Track beds"));
        assert!(text.contains("CONSTRAINTS:\n1. On-premise"));
        assert!(text.contains("Provide:\n1. "));
    }
}
