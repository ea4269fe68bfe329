//! New Command
//!
//! Create a project, optionally starting the requirements session at once.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{PlanError, Result};

pub fn run(name: &str, description: &str, gather: bool) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PlanError::Config("Project name cannot be empty".to_string()));
    }

    let ctx = CommandContext::load()?;
    let id = ctx.db.create_project(name.trim(), description.trim())?;

    Output::new().success(&format!("Created project '{}' (id {})", name.trim(), id));

    if gather {
        super::gather::run_with_context(&ctx, id, false)?;
    } else {
        println!("  Next: plancraft gather {}", id);
    }

    Ok(())
}
