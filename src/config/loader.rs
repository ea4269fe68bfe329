//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (<user config dir>/plancraft/config.toml)
//! 3. Project config (.plancraft/config.toml)
//! 4. Environment variables (PLANCRAFT_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{PlanError, Result};

const PROJECT_DIR: &str = ".plancraft";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "PLANCRAFT_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current directory:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with `root` as the project root
    pub fn load_from(root: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path_in(root);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // PLANCRAFT_LLM_MODEL -> llm.model, PLANCRAFT_ELICITATION_TURN_BOUND -> elicitation.turn_bound
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replacen('_', ".", 1).into()),
        );

        let config: Config = figment
            .extract()
            .map_err(|e| PlanError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| PlanError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory
    pub fn global_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "plancraft")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Get project data directory under `root`
    pub fn project_dir_in(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR)
    }

    /// Get path to project config file under `root`
    pub fn project_config_path_in(root: &Path) -> PathBuf {
        Self::project_dir_in(root).join(CONFIG_FILE)
    }

    /// Check if `root` has been initialized
    pub fn is_initialized(root: &Path) -> bool {
        Self::project_dir_in(root).exists()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            PlanError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join(CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_global_config())?;
            info!("Created global config: {}", config_path.display());
        } else {
            info!("Global config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Initialize project configuration under `root`
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir_in(root);
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join(CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        }

        Ok(project_dir)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn default_global_config() -> String {
        r#"# plancraft Global Configuration
# User-wide defaults. Project settings in .plancraft/config.toml override these.

version = "1.0"

[llm]
provider = "anthropic"
model = "claude-sonnet-4-5-20250929"
timeout_secs = 300
temperature = 0.7
"#
        .to_string()
    }

    fn default_project_config() -> String {
        r#"# plancraft Project Configuration
# Project-specific settings that override global defaults.

version = "1.0"

[elicitation]
turn_bound = 8
question_max_tokens = 500
extraction_max_tokens = 2000

[storage]
database = ".plancraft/plancraft.db"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_project_writes_config() {
        let temp_dir = TempDir::new().unwrap();

        let dir = ConfigLoader::init_project(temp_dir.path(), false).unwrap();

        assert!(dir.exists());
        assert!(ConfigLoader::project_config_path_in(temp_dir.path()).exists());
        assert!(ConfigLoader::is_initialized(temp_dir.path()));
    }

    #[test]
    fn test_default_project_config_parses() {
        let temp_dir = TempDir::new().unwrap();
        ConfigLoader::init_project(temp_dir.path(), false).unwrap();

        let config =
            ConfigLoader::load_from_file(&ConfigLoader::project_config_path_in(temp_dir.path()))
                .unwrap();
        assert_eq!(config.elicitation.turn_bound, 8);
    }

    #[test]
    fn test_project_config_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let dir = ConfigLoader::project_dir_in(temp_dir.path());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(CONFIG_FILE),
            "[elicitation]\nquestion_max_tokens = 321\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(temp_dir.path()).unwrap();
        assert_eq!(config.elicitation.question_max_tokens, 321);
        assert_eq!(config.elicitation.extraction_max_tokens, 2000);
    }

    #[test]
    fn test_invalid_project_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[elicitation]\nturn_bound = 0\n").unwrap();

        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(PlanError::Config(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: no other test reads or writes this variable
        unsafe {
            std::env::set_var("PLANCRAFT_LLM_TIMEOUT_SECS", "42");
        }
        let config = ConfigLoader::load_from(temp_dir.path());
        unsafe {
            std::env::remove_var("PLANCRAFT_LLM_TIMEOUT_SECS");
        }
        assert_eq!(config.unwrap().llm.timeout_secs, 42);
    }
}
