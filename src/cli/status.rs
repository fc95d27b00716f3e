//! CLI handler for the `status` subcommand.

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::PlanError;
use crate::loader::load_documents;
use crate::plan::load_plan_file;

pub fn execute(args: StatusArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };
    config.validate()?;

    let result = load_documents(&config.handoff_dir, &config.include)?;

    if result.documents.is_empty() {
        println!("No handoffs found under {}", config.handoff_dir.display());
        return Ok(());
    }

    for doc in &result.documents {
        let plan_summary = match load_plan_file(&config.plans_dir, doc.id()) {
            Ok(plan) => format!(
                "plan: {} {}/{}",
                plan.frontmatter.status,
                plan.frontmatter.requirements_done,
                plan.frontmatter.requirements_total
            ),
            Err(PlanError::NotFound { .. }) => "plan: -".to_string(),
            Err(e) => format!("plan: unreadable ({})", e),
        };

        println!(
            "{}  {:<8}  {:<12}  {}",
            doc.id(),
            doc.frontmatter.direction,
            doc.frontmatter.status,
            plan_summary
        );
    }

    if !result.errors.is_empty() {
        println!("\n{} file(s) could not be parsed:", result.errors.len());
        for error in &result.errors {
            println!("  {}", error);
        }
    }

    Ok(())
}
