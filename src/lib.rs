//! plancraft - AI-Driven Requirements Elicitation and System Design
//!
//! Runs a bounded question/answer session with a language model to gather
//! software requirements, extracts them into structured records, and
//! generates design artifacts (architecture, data model, user stories, ...)
//! from the stored requirements.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plancraft::{Config, Database, Session, Extractor, create_provider};
//!
//! let config = Config::default();
//! let provider = create_provider(&config.llm.provider_config())?;
//! let mut session = Session::new(provider.clone(), &config.elicitation);
//! session.start("Ward Tracker", "Hospital bed management");
//!
//! let mut answer = None;
//! while let Some(question) = session.next_question(answer.as_deref()).await? {
//!     answer = Some(ask_user(&question));
//! }
//! let requirements = Extractor::new(provider, &config.elicitation)
//!     .extract_requirements(&session.snapshot()?)
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction, retry chain, tolerant decoding
//! - [`planner`]: conversation session, extractor, generation pipeline
//! - [`storage`]: SQLite record store with connection pooling
//! - [`config`]: layered configuration
//! - [`cli`]: command-line surface

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod planner;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ElicitationConfig, LlmConfig, StorageConfig};

// Error Types
pub use types::error::{ErrorCategory, LlmError, PlanError, Result, ResultExt};

// Records
pub use types::{
    Artifact, ArtifactKind, Project, ProjectSummary, Requirement, RequirementCategory,
    RequirementSet, Topic, Transcript, Turn, UserStory,
};

// Storage
pub use storage::database::PoolConfig;
pub use storage::{Database, SharedDatabase};

// =============================================================================
// Engine Re-exports
// =============================================================================

pub use planner::{
    AnswerSource, Extractor, GatherOutcome, GeneratedArtifact, Pipeline, Session,
    SessionSnapshot, Workflow,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    ChatRequest, DecodeOutcome, LlmProvider, LlmResponse, ProviderChain, ProviderChainBuilder,
    SharedProvider, create_provider, decode,
};
