//! Generate Command
//!
//! Generate design artifacts from stored requirements.

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, runtime};
use crate::planner::GeneratedArtifact;
use crate::types::{ArtifactKind, Result};

/// What to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    One(ArtifactKind),
    All,
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::One)
        }
    }
}

pub fn run(project_id: i64, target: Target) -> Result<()> {
    let ctx = CommandContext::load()?;
    let workflow = ctx.workflow()?;
    let out = Output::new();
    let rt = runtime()?;

    match target {
        Target::One(kind) => {
            out.info(&format!("Generating {}...", kind.title()));
            let artifact = rt.block_on(workflow.generate(project_id, kind))?;
            report(&out, &artifact);
        }
        Target::All => {
            out.info(&format!(
                "Generating {} artifacts...",
                ArtifactKind::INDIVIDUAL.len()
            ));
            let artifacts = rt.block_on(
                workflow.generate_all(project_id, |artifact| report(&out, artifact)),
            )?;
            out.success(&format!("Generated {} artifacts", artifacts.len()));
        }
    }

    println!("  View with: plancraft show {} --artifact <kind>", project_id);
    Ok(())
}

fn report(out: &Output, artifact: &GeneratedArtifact) {
    if artifact.is_empty() {
        out.warning(&format!(
            "{}: the model reply could not be used; nothing stored",
            artifact.kind.title()
        ));
        return;
    }

    match &artifact.stories {
        Some(stories) => out.success(&format!(
            "{}: {} stories",
            artifact.kind.title(),
            stories.len()
        )),
        None => out.success(&format!(
            "{}: {} characters",
            artifact.kind.title(),
            artifact.content.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse() {
        assert_eq!("all".parse::<Target>(), Ok(Target::All));
        assert_eq!("ALL".parse::<Target>(), Ok(Target::All));
        assert_eq!(
            "data_model".parse::<Target>(),
            Ok(Target::One(ArtifactKind::DataModel))
        );
        assert!("blueprint".parse::<Target>().is_err());
    }
}
