//! CLI handler for the `complete` subcommand.
//!
//! Pure completion transform plus the read-modify-write of the plan
//! file: counts are recomputed and status re-derived before persisting.

use crate::cli::CompleteArgs;
use crate::config::Config;
use crate::plan::{load_plan_file, mark_requirement_complete, save_plan_file};

pub fn execute(args: CompleteArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };
    config.validate()?;

    let mut plan = load_plan_file(&config.plans_dir, &args.handoff_id)?;
    plan.requirements = mark_requirement_complete(&plan.requirements, &args.requirement)?;
    plan.refresh_counts();
    let path = save_plan_file(&config.plans_dir, &plan)?;

    println!(
        "{}: {}/{} requirements complete (plan status: {})",
        args.requirement,
        plan.frontmatter.requirements_done,
        plan.frontmatter.requirements_total,
        plan.frontmatter.status
    );
    println!("Updated {}", path.display());

    Ok(())
}
