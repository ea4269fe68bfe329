//! Init Command
//!
//! Initialize plancraft in the current directory.

use crate::cli::ui::Output;
use crate::cli::util::{database_path, open_database};
use crate::config::ConfigLoader;
use crate::types::{PlanError, Result};

pub fn run(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let out = Output::new();

    if ConfigLoader::is_initialized(&root) && !force {
        return Err(PlanError::Config(
            "Already initialized. Use --force to overwrite the project config.".to_string(),
        ));
    }

    let project_dir = ConfigLoader::init_project(&root, force)?;

    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    let config = ConfigLoader::load_from(&root)?;
    open_database(&root, &config)?;

    out.success(&format!("Initialized plancraft in {}", project_dir.display()));
    out.field("Database", &database_path(&root, &config).display().to_string());
    println!();
    println!("Next steps:");
    println!("  1. Export ANTHROPIC_API_KEY (or configure another provider)");
    println!("  2. Run 'plancraft new <name> <description> --gather'");

    Ok(())
}
