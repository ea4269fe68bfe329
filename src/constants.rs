//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Elicitation session constants
pub mod elicitation {
    /// Default number of questions asked per session
    pub const DEFAULT_TURN_BOUND: usize = 8;

    /// Output ceiling for a single question
    pub const QUESTION_MAX_TOKENS: u32 = 500;

    /// Output ceiling for requirement extraction
    pub const EXTRACTION_MAX_TOKENS: u32 = 2000;

    /// Placeholder substituted by the CLI for an empty answer
    pub const EMPTY_ANSWER_PLACEHOLDER: &str = "No specific requirements for this area.";
}

/// Artifact generation output ceilings (tokens)
pub mod generation {
    pub const COMPLETE_DESIGN_MAX_TOKENS: u32 = 8000;
    pub const RECOMMENDATIONS_MAX_TOKENS: u32 = 6000;
    pub const USER_STORIES_MAX_TOKENS: u32 = 6000;
    pub const DETAILED_MAX_TOKENS: u32 = 4000;
    pub const SUMMARY_MAX_TOKENS: u32 = 3000;
}

/// Provider chain constants
pub mod chain {
    /// Maximum total attempts across all providers
    pub const MAX_TOTAL_ATTEMPTS: usize = 6;

    /// Default maximum retries per provider
    pub const DEFAULT_MAX_RETRIES: u8 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 30;

    /// Backoff multiplier
    pub const BACKOFF_FACTOR: f32 = 2.0;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
