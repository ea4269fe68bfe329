//! Structured Elicitation & Extraction Engine
//!
//! - [`Session`]: bounded question/answer exchange with the model
//! - [`Extractor`]: one constrained utterance, decoded tolerantly
//! - [`Pipeline`]: single-shot artifact generation from stored requirements
//! - [`Workflow`]: runs the above against the record store

pub mod extractor;
pub mod pipeline;
pub mod prompts;
pub mod session;
pub mod workflow;

pub use extractor::Extractor;
pub use pipeline::{GeneratedArtifact, Pipeline, max_tokens};
pub use session::{Session, SessionSnapshot};
pub use workflow::{AnswerSource, GatherOutcome, Workflow};
