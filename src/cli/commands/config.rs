//! Config Command
//!
//! Manage plancraft configuration.
//!
//! Usage:
//!   plancraft config show [-g] [-f toml|json]
//!   plancraft config path
//!   plancraft config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{PlanError, Result};

/// Show configuration
pub fn show(global: bool, format: &str) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(path) if path.exists() => {
                println!("# Global Config: {}\n", path.display());
                println!("{}", std::fs::read_to_string(&path)?);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'plancraft config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }

    // Merged effective config
    let root = std::env::current_dir()?;
    let config = ConfigLoader::load_from(&root)?;
    let rendered = if format == "json" {
        serde_json::to_string_pretty(&config)?
    } else {
        toml::to_string_pretty(&config)
            .map_err(|e| PlanError::Config(format!("Failed to render config: {}", e)))?
    };
    println!("{}", rendered);
    Ok(())
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    let root = std::env::current_dir()?;
    let out = Output::new();

    match ConfigLoader::global_config_path() {
        Some(global) => out.field(
            "Global",
            &format!("{}{}", global.display(), exists_marker(global.exists())),
        ),
        None => out.field("Global", "(unavailable)"),
    }

    let project = ConfigLoader::project_config_path_in(&root);
    out.field(
        "Project",
        &format!("{}{}", project.display(), exists_marker(project.exists())),
    );
    out.field("Environment", "PLANCRAFT_<SECTION>_<KEY>, e.g. PLANCRAFT_LLM_MODEL");
    Ok(())
}

fn exists_marker(exists: bool) -> &'static str {
    if exists { "" } else { " (not created)" }
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let path = ConfigLoader::init_global(force)?;
    Output::new().success(&format!("Global configuration: {}", path.display()));
    Ok(())
}

/// Initialize project configuration
pub fn init_project(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    ConfigLoader::init_project(&root, force)?;
    Output::new().success(&format!(
        "Project configuration: {}",
        ConfigLoader::project_config_path_in(&root).display()
    ));
    Ok(())
}
