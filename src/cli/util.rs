//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::info;

use crate::ai::{ChainConfig, ProviderChain, SharedProvider, create_provider};
use crate::config::{Config, ConfigLoader};
use crate::planner::Workflow;
use crate::storage::{Database, SharedDatabase};
use crate::types::{PlanError, Result};

/// Command execution context
///
/// Created via `CommandContext::load()` for commands that touch the record
/// store. Commands that also call the model use [`CommandContext::workflow`].
#[derive(Clone)]
pub struct CommandContext {
    /// Project root directory
    pub project_root: PathBuf,
    /// Shared database handle
    pub db: SharedDatabase,
    /// Loaded configuration
    pub config: Config,
}

impl CommandContext {
    /// Validates initialization, loads config, and opens the database.
    pub fn load() -> Result<Self> {
        let project_root = std::env::current_dir()?;
        require_initialized(&project_root)?;
        let config = ConfigLoader::load_from(&project_root)?;
        let db = open_database(&project_root, &config)?;

        Ok(Self {
            project_root,
            db: Arc::new(db),
            config,
        })
    }

    /// Workflow over this context's store, with a provider built from config
    pub fn workflow(&self) -> Result<Workflow> {
        let provider = build_provider(&self.config)?;
        info!("Using LLM provider: {} ({})", provider.name(), provider.model());
        Ok(Workflow::new(
            self.db.clone(),
            provider,
            self.config.clone(),
        ))
    }
}

/// Require `.plancraft/` under `root`
pub fn require_initialized(root: &Path) -> Result<()> {
    if ConfigLoader::is_initialized(root) {
        Ok(())
    } else {
        Err(PlanError::NotInitialized)
    }
}

/// Database path from config, resolved against `root` when relative
pub fn database_path(root: &Path, config: &Config) -> PathBuf {
    if config.storage.database.is_absolute() {
        config.storage.database.clone()
    } else {
        root.join(&config.storage.database)
    }
}

/// Open (creating if needed) and initialize the record store
pub fn open_database(root: &Path, config: &Config) -> Result<Database> {
    let db_path = database_path(root, config);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::open(&db_path)?;
    db.initialize()?;
    Ok(db)
}

/// Primary provider, wrapped in a retry/fallback chain when configured
pub fn build_provider(config: &Config) -> Result<SharedProvider> {
    let primary = config.llm.provider_config();

    if !config.llm.uses_chain() {
        return create_provider(&primary);
    }

    let mut configs = vec![primary];
    if let Some(fallback) = config.llm.fallback_config() {
        info!(
            "Provider chain: {} -> {} (fallback)",
            configs[0].provider, fallback.provider
        );
        configs.push(fallback);
    }

    let chain = ProviderChain::from_configs(
        &configs,
        config.llm.max_retries,
        ChainConfig::default(),
    )?;
    Ok(Arc::new(chain))
}

/// Runtime for driving async workflow calls from synchronous commands
pub fn runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| PlanError::Session(format!("Failed to start runtime: {}", e)))
}
