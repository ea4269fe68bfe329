//! Delete Command

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub fn run(project_id: i64, yes: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    let out = Output::new();
    let project = ctx.db.get_project(project_id)?;

    if !yes {
        let prompt = format!(
            "Delete '{}' with {} requirements and {} artifacts?",
            project.name,
            project.requirements.len(),
            project.artifacts.len()
        );
        if !out.confirm(&prompt)? {
            out.info("Cancelled");
            return Ok(());
        }
    }

    ctx.db.delete_project(project_id)?;
    out.success(&format!("Deleted project '{}'", project.name));
    Ok(())
}
