//! AI Integration Layer
//!
//! Model gateways, prompt construction and output decoding.

pub mod prompt;
pub mod provider;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection};
pub use provider::{
    AnthropicProvider, ChainConfig, ChainedProvider, ChatRequest, ErrorCategory, ErrorClassifier,
    LlmError, LlmProvider, LlmResponse, OllamaProvider, OpenAiProvider, ProviderChain,
    ProviderChainBuilder, ProviderConfig, ResponseMetadata, ResponseTiming, SharedProvider,
    TokenUsage, create_provider,
};
pub use validation::{DecodeOutcome, decode};
