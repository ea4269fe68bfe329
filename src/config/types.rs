//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (user config dir) and project (.plancraft/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::ProviderConfig;
use crate::constants::elicitation;
use crate::types::{PlanError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Question/answer session settings
    pub elicitation: ElicitationConfig,

    /// Record store settings
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            elicitation: ElicitationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PlanError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(PlanError::Config(format!(
                "LLM temperature must be between 0.0 and 1.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(PlanError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(base) = &self.llm.api_base {
            url::Url::parse(base).map_err(|e| {
                PlanError::Config(format!("Invalid llm.api_base '{}': {}", base, e))
            })?;
        }

        if self.elicitation.turn_bound == 0 {
            return Err(PlanError::Config(
                "elicitation.turn_bound must be greater than 0".to_string(),
            ));
        }

        if self.elicitation.question_max_tokens == 0 || self.elicitation.extraction_max_tokens == 0
        {
            return Err(PlanError::Config(
                "elicitation token limits must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: anthropic, openai, ollama
    pub provider: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature for every request
    pub temperature: f32,

    /// Custom endpoint for the primary provider
    pub api_base: Option<String>,

    /// Attempts per provider when the retry chain is enabled
    pub max_retries: u8,

    /// Fallback provider for retry chain
    pub fallback_provider: Option<String>,

    /// Fallback model for retry chain
    pub fallback_model: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            timeout_secs: crate::constants::network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.7,
            api_base: None,
            max_retries: 1,
            fallback_provider: None,
            fallback_model: None,
        }
    }
}

impl LlmConfig {
    /// Provider settings for the primary provider
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            model: Some(self.model.clone()),
            timeout_secs: self.timeout_secs,
            api_key: None,
            api_base: self.api_base.clone(),
        }
    }

    /// Provider settings for the fallback provider, if one is configured
    pub fn fallback_config(&self) -> Option<ProviderConfig> {
        self.fallback_provider.as_ref().map(|provider| ProviderConfig {
            provider: provider.clone(),
            model: self.fallback_model.clone(),
            timeout_secs: self.timeout_secs,
            api_key: None,
            api_base: None,
        })
    }

    /// Whether calls should go through the retry/fallback chain
    pub fn uses_chain(&self) -> bool {
        self.fallback_provider.is_some() || self.max_retries > 1
    }
}

// =============================================================================
// Elicitation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElicitationConfig {
    /// Number of questions per session
    pub turn_bound: usize,

    /// Output ceiling for one question
    pub question_max_tokens: u32,

    /// Output ceiling for requirement extraction
    pub extraction_max_tokens: u32,
}

impl Default for ElicitationConfig {
    fn default() -> Self {
        Self {
            turn_bound: elicitation::DEFAULT_TURN_BOUND,
            question_max_tokens: elicitation::QUESTION_MAX_TOKENS,
            extraction_max_tokens: elicitation::EXTRACTION_MAX_TOKENS,
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database path, relative to the project root unless absolute
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(".plancraft/plancraft.db"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.elicitation.turn_bound, 8);
        assert_eq!(config.elicitation.question_max_tokens, 500);
        assert_eq!(config.elicitation.extraction_max_tokens, 2000);
        assert_eq!(config.llm.provider, "anthropic");
    }

    #[test]
    fn test_zero_turn_bound_rejected() {
        let mut config = Config::default();
        config.elicitation.turn_bound = 0;
        assert!(matches!(config.validate(), Err(PlanError::Config(_))));
    }

    #[test]
    fn test_temperature_range() {
        let mut config = Config::default();
        config.llm.temperature = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_api_base_rejected() {
        let mut config = Config::default();
        config.llm.api_base = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chain_selection() {
        let mut llm = LlmConfig::default();
        assert!(!llm.uses_chain());
        assert!(llm.fallback_config().is_none());

        llm.fallback_provider = Some("ollama".to_string());
        assert!(llm.uses_chain());
        assert_eq!(llm.fallback_config().unwrap().provider, "ollama");
    }

    #[test]
    fn test_provider_config_carries_model() {
        let llm = LlmConfig::default();
        let provider = llm.provider_config();
        assert_eq!(provider.model.as_deref(), Some("claude-sonnet-4-5-20250929"));
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.elicitation.turn_bound, config.elicitation.turn_bound);
        assert_eq!(parsed.storage.database, config.storage.database);
    }
}
