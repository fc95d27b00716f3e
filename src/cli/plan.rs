//! CLI handler for the `plan` subcommand.

use crate::cli::PlanArgs;
use crate::config::Config;
use crate::error::LoaderError;
use crate::loader::{find_by_id, load_documents};
use crate::plan::create_plan_file;
use tracing::info;

pub fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };
    config.validate()?;

    let result = load_documents(&config.handoff_dir, &config.include)?;
    let doc = find_by_id(&result.documents, &args.handoff_id)
        .ok_or_else(|| LoaderError::NotFound(args.handoff_id.clone()))?;

    let (path, plan) = create_plan_file(&config.plans_dir, doc)?;

    info!("Plan written to {:?}", path);
    println!(
        "Created {} with {} requirements (status: {})",
        path.display(),
        plan.frontmatter.requirements_total,
        plan.frontmatter.status
    );
    for req in &plan.requirements {
        println!(
            "  {}  [{}/{}]  {}",
            req.id, req.category, req.priority, req.description
        );
    }

    Ok(())
}
