//! Workflow: runs the elicitation core against the record store
//!
//! Loads projects, feeds answers into a [`Session`], persists extracted
//! requirements and generated artifacts.

use tracing::{info, warn};

use super::extractor::Extractor;
use super::pipeline::{GeneratedArtifact, Pipeline};
use super::session::Session;
use crate::ai::SharedProvider;
use crate::config::Config;
use crate::constants::elicitation::EMPTY_ANSWER_PLACEHOLDER;
use crate::storage::SharedDatabase;
use crate::types::{ArtifactKind, PlanError, RequirementSet, Result};

/// Supplies answers to session questions
pub trait AnswerSource {
    /// Answer for question `index` (1-based)
    fn answer(&mut self, index: usize, question: &str) -> Result<String>;
}

/// Result of a completed gathering session
#[derive(Debug, Clone)]
pub struct GatherOutcome {
    pub requirements: RequirementSet,
    /// Requirements written to the store
    pub stored: usize,
    pub summary: String,
}

pub struct Workflow {
    db: SharedDatabase,
    provider: SharedProvider,
    config: Config,
}

impl Workflow {
    pub fn new(db: SharedDatabase, provider: SharedProvider, config: Config) -> Self {
        Self {
            db,
            provider,
            config,
        }
    }

    pub fn session(&self) -> Session {
        Session::new(self.provider.clone(), &self.config.elicitation)
            .with_temperature(self.config.llm.temperature)
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.provider.clone(), &self.config.elicitation)
            .with_temperature(self.config.llm.temperature)
    }

    /// Whether the configured provider answers its health check
    pub async fn check_provider(&self) -> bool {
        match self.provider.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(provider = self.provider.name(), "Health check failed: {}", e);
                false
            }
        }
    }

    fn extractor(&self) -> Extractor {
        Extractor::new(self.provider.clone(), &self.config.elicitation)
            .with_temperature(self.config.llm.temperature)
    }

    /// Run a full question/answer session for a project and store the
    /// extracted requirements.
    ///
    /// Existing requirements are only replaced when `replace` is set. An
    /// extraction that yields nothing leaves the store untouched.
    pub async fn gather<A: AnswerSource>(
        &self,
        project_id: i64,
        answers: &mut A,
        replace: bool,
    ) -> Result<GatherOutcome> {
        let project = self.db.get_project(project_id)?;

        if !project.requirements.is_empty() && !replace {
            return Err(PlanError::precondition(format!(
                "project {} already has {} requirements; pass --force to replace them",
                project_id,
                project.requirements.len()
            )));
        }

        let mut session = self.session();
        session.start(&project.name, &project.description);
        info!(session = %session.id(), project_id, "Gathering requirements");

        let mut answer: Option<String> = None;
        loop {
            let question = match session.next_question(answer.as_deref()).await? {
                Some(question) => question,
                None => break,
            };

            let reply = answers.answer(session.questions_asked(), &question)?;
            answer = Some(if reply.trim().is_empty() {
                EMPTY_ANSWER_PLACEHOLDER.to_string()
            } else {
                reply
            });
        }

        let snapshot = session.snapshot()?;
        let requirements = self.extractor().extract_requirements(&snapshot).await?;

        let stored = if requirements.is_empty() {
            warn!(project_id, "No requirements extracted; store left unchanged");
            0
        } else {
            self.db.replace_requirements(project_id, &requirements)?
        };

        Ok(GatherOutcome {
            requirements,
            stored,
            summary: session.conversation_summary(),
        })
    }

    /// Generate one artifact from the stored requirements and persist it.
    ///
    /// Empty results (undecodable user stories) are returned but not stored.
    pub async fn generate(&self, project_id: i64, kind: ArtifactKind) -> Result<GeneratedArtifact> {
        let project = self.db.get_project(project_id)?;
        let artifact = self
            .pipeline()
            .generate(kind, &project.topic(), &project.requirements)
            .await?;
        self.persist(project_id, &artifact)?;
        Ok(artifact)
    }

    /// Generate and persist every individual artifact kind, in order.
    pub async fn generate_all<F>(
        &self,
        project_id: i64,
        mut on_artifact: F,
    ) -> Result<Vec<GeneratedArtifact>>
    where
        F: FnMut(&GeneratedArtifact),
    {
        let project = self.db.get_project(project_id)?;
        self.pipeline()
            .generate_all(&project.topic(), &project.requirements, |artifact| {
                self.persist(project_id, artifact)?;
                on_artifact(artifact);
                Ok(())
            })
            .await
    }

    fn persist(&self, project_id: i64, artifact: &GeneratedArtifact) -> Result<()> {
        if artifact.is_empty() {
            warn!(project_id, kind = %artifact.kind, "Empty artifact not stored");
            return Ok(());
        }
        self.db
            .add_artifact(project_id, artifact.kind, &artifact.content)?;
        info!(project_id, kind = %artifact.kind, "Artifact stored");
        Ok(())
    }
}
