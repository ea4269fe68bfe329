//! Gather Command
//!
//! Run the interactive question/answer session for a project and store the
//! extracted requirements.

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, runtime};
use crate::planner::AnswerSource;
use crate::types::{RequirementCategory, Result};

/// Reads answers from the terminal
struct TerminalAnswers<'a> {
    out: &'a Output,
    bound: usize,
}

impl AnswerSource for TerminalAnswers<'_> {
    fn answer(&mut self, index: usize, question: &str) -> Result<String> {
        self.out.question(index, self.bound, question);
        self.out.prompt(">")
    }
}

pub fn run(project_id: i64, force: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    run_with_context(&ctx, project_id, force)
}

pub(crate) fn run_with_context(ctx: &CommandContext, project_id: i64, force: bool) -> Result<()> {
    let out = Output::new();
    let workflow = ctx.workflow()?;
    let project = ctx.db.get_project(project_id)?;

    out.header(&format!("Requirements session: {}", project.name));
    out.info(&format!(
        "{} questions. Press Enter to skip a question.",
        ctx.config.elicitation.turn_bound
    ));

    let mut answers = TerminalAnswers {
        out: &out,
        bound: ctx.config.elicitation.turn_bound,
    };

    let rt = runtime()?;
    if !rt.block_on(workflow.check_provider()) {
        out.warning("LLM provider did not pass its health check; questions may fail.");
    }

    let outcome = rt.block_on(workflow.gather(project_id, &mut answers, force))?;

    if outcome.requirements.is_empty() {
        out.warning("No requirements could be extracted from the conversation.");
        return Ok(());
    }

    out.success(&format!("Stored {} requirements", outcome.stored));
    for category in RequirementCategory::ALL {
        let items = match category {
            RequirementCategory::Functional => &outcome.requirements.functional,
            RequirementCategory::NonFunctional => &outcome.requirements.non_functional,
            RequirementCategory::Constraint => &outcome.requirements.constraints,
        };
        if items.is_empty() {
            continue;
        }
        out.section(category.heading());
        for (i, item) in items.iter().enumerate() {
            println!("  {}. {}", i + 1, item);
        }
    }

    Ok(())
}
