//! Fallback Provider Chain
//!
//! Gateway-level retry and fallback. The elicitation core never retries on its
//! own; wrapping the configured provider in a chain is the only place where a
//! failed call is repeated.
//!
//! ## Strategy
//!
//! 1. Try providers in priority order
//! 2. On failure, classify the error by category
//! 3. Rate limit: wait, then retry the same provider
//! 4. Network/transient: exponential backoff with random jitter
//! 5. Auth/unavailable/token limit: move to the next provider
//! 6. Bad request: stop immediately

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::constants::chain as chain_constants;

use super::{ChatRequest, LlmProvider, LlmResponse, ProviderConfig, SharedProvider};
use crate::types::{ErrorCategory, ErrorClassifier, PlanError, Result};

/// Provider with metadata for chain routing
#[derive(Clone)]
pub struct ChainedProvider {
    pub provider: SharedProvider,
    /// Priority (lower = try first)
    pub priority: u8,
    /// Maximum attempts for this provider
    pub max_retries: u8,
}

impl ChainedProvider {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            priority: 100,
            max_retries: chain_constants::DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }
}

/// Configuration for the provider chain
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Maximum total attempts across all providers
    pub max_total_attempts: usize,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_factor: f32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_total_attempts: chain_constants::MAX_TOTAL_ATTEMPTS,
            base_delay: Duration::from_millis(chain_constants::BASE_DELAY_MS),
            max_delay: Duration::from_secs(chain_constants::MAX_DELAY_SECS),
            backoff_factor: chain_constants::BACKOFF_FACTOR,
        }
    }
}

/// Execution statistics for the chain
#[derive(Debug, Default)]
pub struct ChainStats {
    pub total_attempts: usize,
    pub successful_provider: Option<String>,
    pub total_duration_ms: u64,
}

/// Fallback provider chain with cascading attempts
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<ChainedProvider>,
    config: ChainConfig,
}

impl ProviderChain {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            providers: Vec::new(),
            config,
        }
    }

    /// Build chain from provider configs, in the given order
    pub fn from_configs(
        configs: &[ProviderConfig],
        max_retries: u8,
        chain_config: ChainConfig,
    ) -> Result<Self> {
        let mut chain = Self::new(chain_config);

        for (idx, config) in configs.iter().enumerate() {
            let provider = super::create_provider(config)?;
            chain.providers.push(
                ChainedProvider::new(provider)
                    .with_priority(idx as u8)
                    .with_max_retries(max_retries),
            );
        }

        Ok(chain)
    }

    /// Execute with fallback chain
    #[instrument(skip(self, request), fields(providers = self.providers.len()))]
    pub async fn execute(&self, request: &ChatRequest) -> Result<(LlmResponse, ChainStats)> {
        let mut stats = ChainStats::default();
        let start_time = std::time::Instant::now();

        if self.providers.is_empty() {
            return Err(PlanError::Config(
                "No providers configured in chain".to_string(),
            ));
        }

        let mut last_error: Option<PlanError> = None;

        'providers: for entry in &self.providers {
            let provider = &entry.provider;
            let provider_name = provider.name().to_string();
            let mut current_delay = self.config.base_delay;

            for attempt in 1..=entry.max_retries {
                if stats.total_attempts >= self.config.max_total_attempts {
                    break 'providers;
                }
                stats.total_attempts += 1;

                debug!(
                    total_attempt = stats.total_attempts,
                    provider = %provider_name,
                    attempt = attempt,
                    max_retries = entry.max_retries,
                    "Chain attempt"
                );

                match provider.send(request).await {
                    Ok(response) => {
                        stats.successful_provider = Some(provider_name);
                        stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

                        info!(
                            provider = %stats.successful_provider.as_deref().unwrap_or("unknown"),
                            attempts = stats.total_attempts,
                            "Chain succeeded"
                        );
                        return Ok((response, stats));
                    }
                    Err(err) => {
                        let classified = ErrorClassifier::classify_plan_error(&err, &provider_name);

                        warn!(
                            provider = %provider_name,
                            attempt = attempt,
                            error = %err,
                            category = %classified.category,
                            "Provider failed"
                        );

                        last_error = Some(err);
                        let is_last_attempt = attempt >= entry.max_retries;

                        match classified.category {
                            ErrorCategory::Auth
                            | ErrorCategory::TokenLimit
                            | ErrorCategory::Unavailable => {
                                info!(provider = %provider_name, category = %classified.category, "Trying next provider");
                                break;
                            }
                            ErrorCategory::BadRequest => {
                                warn!("Bad request error, stopping chain");
                                break 'providers;
                            }
                            ErrorCategory::RateLimit => {
                                if !is_last_attempt {
                                    let wait = classified
                                        .recommended_delay()
                                        .min(self.config.max_delay);
                                    info!(
                                        wait_secs = wait.as_secs(),
                                        "Rate limited, waiting before retry"
                                    );
                                    sleep(wait).await;
                                }
                            }
                            ErrorCategory::Network
                            | ErrorCategory::Transient
                            | ErrorCategory::Unknown => {
                                if !is_last_attempt {
                                    let delay = current_delay + random_jitter(current_delay);
                                    debug!(delay_ms = delay.as_millis(), "Retrying after backoff");
                                    sleep(delay).await;
                                    current_delay = calculate_backoff(
                                        current_delay,
                                        self.config.backoff_factor,
                                        self.config.max_delay,
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }

        stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

        Err(last_error
            .unwrap_or_else(|| PlanError::LlmApi("All providers in chain failed".to_string())))
    }
}

#[async_trait]
impl LlmProvider for ProviderChain {
    async fn send(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let (response, _stats) = self.execute(request).await?;
        Ok(response)
    }

    fn name(&self) -> &str {
        "provider-chain"
    }

    fn model(&self) -> &str {
        self.providers
            .first()
            .map(|p| p.provider.model())
            .unwrap_or("unknown")
    }

    async fn health_check(&self) -> Result<bool> {
        for provider in &self.providers {
            if provider.provider.health_check().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Generate random jitter using thread-local RNG
fn random_jitter(base_delay: Duration) -> Duration {
    let max_jitter_ms = (base_delay.as_millis() as u64) / 4;
    if max_jitter_ms == 0 {
        return Duration::ZERO;
    }
    let jitter_ms = rand::rng().random_range(0..max_jitter_ms);
    Duration::from_millis(jitter_ms)
}

/// Calculate exponential backoff with cap
fn calculate_backoff(current: Duration, factor: f32, max: Duration) -> Duration {
    let next = Duration::from_secs_f32(current.as_secs_f32() * factor);
    std::cmp::min(next, max)
}

/// Builder for creating provider chains
pub struct ProviderChainBuilder {
    providers: Vec<ChainedProvider>,
    config: ChainConfig,
}

impl ProviderChainBuilder {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            config: ChainConfig::default(),
        }
    }

    /// Add a provider with automatic settings
    pub fn add_provider(self, provider: impl LlmProvider + 'static) -> Self {
        self.add_shared(Arc::new(provider))
    }

    /// Add a shared provider with automatic settings
    pub fn add_shared(mut self, provider: SharedProvider) -> Self {
        let chained = ChainedProvider::new(provider).with_priority(self.providers.len() as u8);
        self.providers.push(chained);
        self
    }

    /// Add a provider with custom configuration
    pub fn add_with_config(mut self, provider: ChainedProvider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(mut self) -> ProviderChain {
        self.providers.sort_by_key(|p| p.priority);
        ProviderChain {
            providers: self.providers,
            config: self.config,
        }
    }
}

impl Default for ProviderChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LlmError, Turn};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MockProvider {
        name: String,
        category: ErrorCategory,
        fail_count: AtomicU32,
        max_failures: u32,
    }

    impl MockProvider {
        fn healthy(name: &str) -> Self {
            Self::failing(name, ErrorCategory::Transient, 0)
        }

        fn failing(name: &str, category: ErrorCategory, failures: u32) -> Self {
            Self {
                name: name.to_string(),
                category,
                fail_count: AtomicU32::new(0),
                max_failures: failures,
            }
        }

        fn calls(&self) -> u32 {
            self.fail_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn send(&self, _request: &ChatRequest) -> Result<LlmResponse> {
            let count = self.fail_count.fetch_add(1, Ordering::SeqCst);
            if count < self.max_failures {
                return Err(LlmError::with_provider(
                    self.category,
                    format!("{} failure", self.name),
                    &self.name,
                )
                .into());
            }
            Ok(LlmResponse::content_only(format!("from {}", self.name)))
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.max_failures == 0)
        }
    }

    fn fast_config() -> ChainConfig {
        ChainConfig {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            ..Default::default()
        }
    }

    fn request() -> ChatRequest {
        ChatRequest::new("sys", vec![Turn::answer("hi")], 10)
    }

    #[tokio::test]
    async fn test_chain_success_first_provider() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::healthy("primary"))
            .add_provider(MockProvider::healthy("fallback"))
            .build();

        let response = chain.send(&request()).await.unwrap();
        assert_eq!(response.content, "from primary");
    }

    #[tokio::test]
    async fn test_chain_fallback_on_auth_error() {
        let primary = Arc::new(MockProvider::failing("primary", ErrorCategory::Auth, 100));
        let chain = ProviderChainBuilder::new()
            .add_shared(primary.clone())
            .add_provider(MockProvider::healthy("fallback"))
            .with_config(fast_config())
            .build();

        let (response, stats) = chain.execute(&request()).await.unwrap();

        assert_eq!(response.content, "from fallback");
        assert_eq!(primary.calls(), 1);
        assert_eq!(stats.total_attempts, 2);
    }

    #[tokio::test]
    async fn test_chain_retry_then_success() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::failing("flaky", ErrorCategory::Transient, 2))
            .with_config(fast_config())
            .build();

        let (response, stats) = chain.execute(&request()).await.unwrap();

        assert_eq!(response.content, "from flaky");
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.successful_provider.as_deref(), Some("flaky"));
    }

    #[tokio::test]
    async fn test_chain_bad_request_stops() {
        let fallback = Arc::new(MockProvider::healthy("fallback"));
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::failing("primary", ErrorCategory::BadRequest, 100))
            .add_shared(fallback.clone())
            .with_config(fast_config())
            .build();

        let err = chain.send(&request()).await.unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::BadRequest));
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_chain_returns_last_error_when_exhausted() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::failing("only", ErrorCategory::Network, 100))
            .with_config(fast_config())
            .build();

        let err = chain.send(&request()).await.unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::Network));
    }

    #[tokio::test]
    async fn test_chain_orders_by_priority() {
        let chain = ProviderChainBuilder::new()
            .add_with_config(
                ChainedProvider::new(Arc::new(MockProvider::healthy("late"))).with_priority(9),
            )
            .add_with_config(
                ChainedProvider::new(Arc::new(MockProvider::healthy("early"))).with_priority(1),
            )
            .build();

        let response = chain.send(&request()).await.unwrap();
        assert_eq!(response.content, "from early");
    }

    #[tokio::test]
    async fn test_empty_chain_is_config_error() {
        let chain = ProviderChainBuilder::new().build();
        assert!(matches!(
            chain.send(&request()).await,
            Err(PlanError::Config(_))
        ));
    }

    #[test]
    fn test_random_jitter() {
        let base = Duration::from_millis(1000);
        let jitter = random_jitter(base);
        assert!(jitter <= Duration::from_millis(250));
    }

    #[test]
    fn test_calculate_backoff() {
        let current = Duration::from_millis(500);
        let next = calculate_backoff(current, 1.5, Duration::from_secs(30));
        assert_eq!(next, Duration::from_millis(750));

        let large = Duration::from_secs(25);
        let capped = calculate_backoff(large, 1.5, Duration::from_secs(30));
        assert_eq!(capped, Duration::from_secs(30));
    }
}
