//! Show Command
//!
//! Print a project with its requirements and generated artifacts.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{ArtifactKind, RequirementCategory, Result, preview};

const ARTIFACT_PREVIEW_CHARS: usize = 300;

pub fn run(project_id: i64, artifact: Option<ArtifactKind>, full: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    let project = ctx.db.get_project(project_id)?;
    let out = Output::new();

    if let Some(kind) = artifact {
        // Latest artifact of the requested kind only
        match project.artifacts.iter().rev().find(|a| a.kind == kind) {
            Some(found) => println!("{}", found.content),
            None => out.warning(&format!("No {} artifact for this project", kind)),
        }
        return Ok(());
    }

    out.header(&project.name);
    out.field("ID", &project.id.to_string());
    if !project.description.is_empty() {
        out.field("Description", &project.description);
    }
    out.field("Created", &project.created_at.format("%Y-%m-%d %H:%M").to_string());
    out.field("Updated", &project.updated_at.format("%Y-%m-%d %H:%M").to_string());

    if project.requirements.is_empty() {
        out.info(&format!(
            "No requirements yet. Run 'plancraft gather {}'.",
            project.id
        ));
    } else {
        for category in RequirementCategory::ALL {
            let items = project.requirements_in(category);
            if items.is_empty() {
                continue;
            }
            out.section(category.heading());
            for (i, requirement) in items.iter().enumerate() {
                println!("  {}. {}", i + 1, requirement.description);
            }
        }
    }

    if !project.artifacts.is_empty() {
        out.section("Artifacts");
        for artifact in &project.artifacts {
            println!(
                "\n  {} ({}, {})",
                artifact.kind.title(),
                artifact.kind,
                artifact.created_at.format("%Y-%m-%d %H:%M")
            );
            let body = if full {
                artifact.content.clone()
            } else {
                preview(&artifact.content, ARTIFACT_PREVIEW_CHARS)
            };
            for line in body.lines() {
                println!("    {}", line);
            }
        }
    }

    Ok(())
}
