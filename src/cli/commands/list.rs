//! List Command

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub fn run(format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let projects = ctx.db.list_projects()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    let out = Output::new();
    if projects.is_empty() {
        out.info("No projects yet. Create one with 'plancraft new <name> <description>'.");
        return Ok(());
    }

    out.header("Projects");
    for project in &projects {
        println!(
            "  {:>4}  {:<30} {:>3} requirements  {:>3} artifacts  {}",
            project.id,
            project.name,
            project.requirement_count,
            project.artifact_count,
            project.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
