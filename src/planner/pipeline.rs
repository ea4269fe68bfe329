//! Artifact Generation Pipeline
//!
//! Stateless single-shot generation: one gateway call per artifact, built
//! only from the topic and the stored requirements. Calls never see each
//! other's output, so identical inputs yield identical requests.

use tracing::{debug, info};

use super::extractor::{Extractor, artifact_request};
use crate::ai::SharedProvider;
use crate::config::ElicitationConfig;
use crate::constants::generation;
use crate::types::{
    ArtifactKind, PlanError, Requirement, Result, Topic, UserStory, render_stories,
};

/// Output of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub content: String,
    /// Decoded stories, for `UserStories` only
    pub stories: Option<Vec<UserStory>>,
}

impl GeneratedArtifact {
    /// Nothing worth storing
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Output ceiling per artifact kind
pub fn max_tokens(kind: ArtifactKind) -> u32 {
    match kind {
        ArtifactKind::CompleteDesign => generation::COMPLETE_DESIGN_MAX_TOKENS,
        ArtifactKind::ArchitectureRecommendations => generation::RECOMMENDATIONS_MAX_TOKENS,
        ArtifactKind::UserStories => generation::USER_STORIES_MAX_TOKENS,
        ArtifactKind::Architecture
        | ArtifactKind::DataModel
        | ArtifactKind::ApiSpecification
        | ArtifactKind::Diagrams => generation::DETAILED_MAX_TOKENS,
        ArtifactKind::TechnologyStack | ArtifactKind::ImplementationPlan => {
            generation::SUMMARY_MAX_TOKENS
        }
    }
}

pub struct Pipeline {
    provider: SharedProvider,
    extractor: Extractor,
    temperature: f32,
}

impl Pipeline {
    pub fn new(provider: SharedProvider, config: &ElicitationConfig) -> Self {
        Self {
            extractor: Extractor::new(provider.clone(), config),
            provider,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.extractor = self.extractor.with_temperature(temperature);
        self.temperature = temperature;
        self
    }

    /// Generate one artifact.
    ///
    /// Fails with `Precondition` before any gateway call when `requirements`
    /// is empty.
    pub async fn generate(
        &self,
        kind: ArtifactKind,
        topic: &Topic,
        requirements: &[Requirement],
    ) -> Result<GeneratedArtifact> {
        ensure_requirements(kind, requirements)?;

        if kind == ArtifactKind::UserStories {
            let stories = self
                .extractor
                .extract_user_stories(topic, requirements)
                .await?;
            return Ok(GeneratedArtifact {
                kind,
                content: render_stories(&stories),
                stories: Some(stories),
            });
        }

        let request = artifact_request(kind, topic, requirements, max_tokens(kind))
            .with_temperature(self.temperature);

        debug!(
            kind = %kind,
            max_tokens = request.max_tokens,
            provider = self.provider.name(),
            "Generating artifact"
        );

        let response = self.provider.send(&request).await?;

        info!(kind = %kind, chars = response.content.len(), "Artifact generated");
        Ok(GeneratedArtifact {
            kind,
            content: response.content,
            stories: None,
        })
    }

    /// Generate every individual kind in order.
    ///
    /// `on_artifact` sees each result as soon as it is produced. Stops at the
    /// first error; artifacts already handed to `on_artifact` stay handed.
    pub async fn generate_all<F>(
        &self,
        topic: &Topic,
        requirements: &[Requirement],
        mut on_artifact: F,
    ) -> Result<Vec<GeneratedArtifact>>
    where
        F: FnMut(&GeneratedArtifact) -> Result<()>,
    {
        ensure_requirements(ArtifactKind::CompleteDesign, requirements)?;

        let mut artifacts = Vec::with_capacity(ArtifactKind::INDIVIDUAL.len());
        for kind in ArtifactKind::INDIVIDUAL {
            let artifact = self.generate(kind, topic, requirements).await?;
            on_artifact(&artifact)?;
            artifacts.push(artifact);
        }
        Ok(artifacts)
    }
}

fn ensure_requirements(kind: ArtifactKind, requirements: &[Requirement]) -> Result<()> {
    if requirements.is_empty() {
        return Err(PlanError::precondition(format!(
            "cannot generate {}: no requirements found, gather requirements first",
            kind.title().to_lowercase()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::scripted::ScriptedProvider;
    use crate::types::{ErrorCategory, LlmError, RequirementCategory};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn requirements() -> Vec<Requirement> {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        vec![
            Requirement {
                id: 1,
                project_id: 1,
                category: RequirementCategory::Functional,
                description: "Track beds".into(),
                created_at: at,
            },
            Requirement {
                id: 2,
                project_id: 1,
                category: RequirementCategory::NonFunctional,
                description: "Respond in 200ms".into(),
                created_at: at,
            },
        ]
    }

    fn topic() -> Topic {
        Topic::new("Ward Tracker", "Hospital bed management")
    }

    fn pipeline(provider: &Arc<ScriptedProvider>) -> Pipeline {
        Pipeline::new(provider.clone(), &ElicitationConfig::default())
    }

    #[tokio::test]
    async fn test_empty_requirements_make_no_calls() {
        let provider = Arc::new(ScriptedProvider::repeating("design"));
        let pipeline = pipeline(&provider);

        for kind in ArtifactKind::ALL {
            let err = pipeline.generate(kind, &topic(), &[]).await.unwrap_err();
            assert!(err.is_precondition(), "{}", kind);
        }
        let err = pipeline
            .generate_all(&topic(), &[], |_| Ok(()))
            .await
            .unwrap_err();
        assert!(err.is_precondition());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_is_idempotent() {
        let provider = Arc::new(ScriptedProvider::repeating("# Architecture"));
        let pipeline = pipeline(&provider);
        let reqs = requirements();

        let first = pipeline
            .generate(ArtifactKind::Architecture, &topic(), &reqs)
            .await
            .unwrap();
        let second = pipeline
            .generate(ArtifactKind::Architecture, &topic(), &reqs)
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(first, second);
        assert_eq!(first.content, "# Architecture");
    }

    #[tokio::test]
    async fn test_per_kind_token_ceilings() {
        let provider = Arc::new(ScriptedProvider::repeating("text"));
        let pipeline = pipeline(&provider);
        let reqs = requirements();

        for (kind, expected) in [
            (ArtifactKind::CompleteDesign, 8000),
            (ArtifactKind::ArchitectureRecommendations, 6000),
            (ArtifactKind::DataModel, 4000),
            (ArtifactKind::TechnologyStack, 3000),
        ] {
            pipeline.generate(kind, &topic(), &reqs).await.unwrap();
            assert_eq!(provider.last_request().unwrap().max_tokens, expected);
        }
    }

    #[tokio::test]
    async fn test_user_stories_rendered() {
        let reply = r#"[{"id": "US-001", "title": "Sign in", "user_story": "As a nurse...",
            "description": "d", "priority": "High", "story_points": 3, "epic": "Access",
            "acceptance_criteria": ["works"]}]"#;
        let provider = Arc::new(ScriptedProvider::new().with_reply(reply));

        let artifact = pipeline(&provider)
            .generate(ArtifactKind::UserStories, &topic(), &requirements())
            .await
            .unwrap();

        assert_eq!(artifact.stories.as_ref().map(Vec::len), Some(1));
        assert!(artifact.content.contains("ID: US-001"));
        assert!(!artifact.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_stories_are_empty() {
        let provider = Arc::new(ScriptedProvider::new().with_reply("no stories today"));

        let artifact = pipeline(&provider)
            .generate(ArtifactKind::UserStories, &topic(), &requirements())
            .await
            .unwrap();
        assert!(artifact.is_empty());
        assert_eq!(artifact.stories, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_generate_all_runs_each_individual_kind() {
        let provider = Arc::new(ScriptedProvider::repeating("[]"));
        let mut seen = Vec::new();

        let artifacts = pipeline(&provider)
            .generate_all(&topic(), &requirements(), |a| {
                seen.push(a.kind);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(artifacts.len(), ArtifactKind::INDIVIDUAL.len());
        assert_eq!(seen, ArtifactKind::INDIVIDUAL.to_vec());
        assert_eq!(provider.call_count(), ArtifactKind::INDIVIDUAL.len());

        // No request carries another call's output
        for request in provider.requests() {
            assert!(!request.messages[0].text.contains("[]"));
        }
    }

    #[tokio::test]
    async fn test_generate_all_stops_at_first_error() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .with_reply("architecture")
                .with_error(LlmError::new(ErrorCategory::Network, "connection reset")),
        );
        let mut seen = 0;

        let err = pipeline(&provider)
            .generate_all(&topic(), &requirements(), |_| {
                seen += 1;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(err.category(), Some(ErrorCategory::Network));
        assert_eq!(seen, 1);
        assert_eq!(provider.call_count(), 2);
    }
}
