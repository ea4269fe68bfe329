//! Conversation Session
//!
//! Drives a bounded question/answer exchange with the model. The session
//! owns its transcript; each call to [`Session::next_question`] makes at most
//! one gateway call and appends at most one answer and one question.
//!
//! Visible turns alternate strictly, starting with a question. The control
//! instruction that asks for the next question is attached to the outgoing
//! request only and never stored.

use tracing::debug;

use super::prompts::ElicitationPrompts;
use crate::ai::{ChatRequest, SharedProvider};
use crate::config::ElicitationConfig;
use crate::types::{PlanError, Result, Role, SessionId, Topic, Transcript, Turn};

/// System instruction and transcript at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub topic: Topic,
    pub system: String,
    pub transcript: Transcript,
}

struct Started {
    topic: Topic,
    system: String,
}

pub struct Session {
    id: SessionId,
    provider: SharedProvider,
    turn_bound: usize,
    max_tokens: u32,
    temperature: f32,
    started: Option<Started>,
    transcript: Transcript,
}

impl Session {
    pub fn new(provider: SharedProvider, config: &ElicitationConfig) -> Self {
        Self {
            id: SessionId::generate(),
            provider,
            turn_bound: config.turn_bound,
            max_tokens: config.question_max_tokens,
            temperature: 0.7,
            started: None,
            transcript: Transcript::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn turn_bound(&self) -> usize {
        self.turn_bound
    }

    /// Begin (or restart) a session on `topic`.
    ///
    /// Clears the transcript and returns the system instruction used for
    /// every subsequent call.
    pub fn start(&mut self, name: &str, description: &str) -> String {
        let topic = Topic::new(name, description);
        let system = ElicitationPrompts::system(&topic, self.turn_bound);

        self.transcript.clear();
        self.id = SessionId::generate();
        self.started = Some(Started {
            topic,
            system: system.clone(),
        });

        debug!(session = %self.id, topic = name, "Session started");
        system
    }

    /// Record `prior_answer` (if any) and fetch the next question.
    ///
    /// Returns `Ok(None)` once `turn_bound` questions have been asked; no
    /// gateway call is made in that case. Gateway errors are returned as-is.
    /// A supplied answer stays recorded even when the call fails, so the
    /// caller retries with `None`.
    pub async fn next_question(&mut self, prior_answer: Option<&str>) -> Result<Option<String>> {
        let Some(started) = self.started.as_ref() else {
            return Err(PlanError::session(
                "next_question called before start",
            ));
        };

        let pending_question = self.transcript.last().map(|t| t.role) == Some(Role::Asker);

        if let Some(answer) = prior_answer {
            if !pending_question {
                return Err(PlanError::session(
                    "answer supplied but no question is awaiting one",
                ));
            }
            self.transcript.push(Turn::answer(answer));
        }

        let index = self.transcript.asker_count() + 1;
        if index > self.turn_bound {
            debug!(session = %self.id, "Question bound reached");
            return Ok(None);
        }

        if prior_answer.is_none() && pending_question {
            return Err(PlanError::session(format!(
                "question {} has not been answered",
                index - 1
            )));
        }

        let control = if index == 1 {
            ElicitationPrompts::first_question(&started.topic, self.turn_bound)
        } else {
            ElicitationPrompts::next_question(index, self.turn_bound)
        };

        let request = ChatRequest::new(
            started.system.clone(),
            self.transcript.with_trailing(Turn::control(control)),
            self.max_tokens,
        )
        .with_temperature(self.temperature);

        debug!(
            session = %self.id,
            question = index,
            bound = self.turn_bound,
            provider = self.provider.name(),
            "Requesting question"
        );

        let response = self.provider.send(&request).await?;
        self.transcript.push(Turn::question(response.content.clone()));

        Ok(Some(response.content))
    }

    /// Copy of the transcript
    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }

    /// Topic, system instruction and transcript for extraction
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let started = self
            .started
            .as_ref()
            .ok_or_else(|| PlanError::session("session has not been started"))?;

        Ok(SessionSnapshot {
            topic: started.topic.clone(),
            system: started.system.clone(),
            transcript: self.transcript.clone(),
        })
    }

    pub fn conversation_summary(&self) -> String {
        self.transcript.summary()
    }

    pub fn questions_asked(&self) -> usize {
        self.transcript.asker_count()
    }

    /// All questions asked and the last one answered
    pub fn is_complete(&self) -> bool {
        self.questions_asked() >= self.turn_bound
            && self.transcript.last().map(|t| t.role) == Some(Role::Responder)
    }
}
