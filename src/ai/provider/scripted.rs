//! Scripted provider for unit tests
//!
//! Replies are taken from a queue in order; once the queue is empty the
//! fallback reply is used. Every request is recorded for later inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatRequest, LlmProvider, LlmResponse};
use crate::types::{LlmError, Result};

type Reply = std::result::Result<String, LlmError>;

pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    fallback: String,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: "Scripted reply".to_string(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call returns the same text
    pub fn repeating(text: impl Into<String>) -> Self {
        Self {
            fallback: text.into(),
            ..Self::new()
        }
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn with_error(self, error: LlmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn send(&self, request: &ChatRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(LlmResponse::content_only(text)),
            Some(Err(err)) => Err(err.into()),
            None => Ok(LlmResponse::content_only(self.fallback.clone())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
