//! CLI handler for the `close` subcommand.
//!
//! Runs the verification command set and, when every command passes,
//! writes the report and flips the handoff to done.

use crate::cli::CloseArgs;
use crate::closure::{close_handoff, ClosureContext, ShellVerifier};
use crate::config::Config;
use crate::error::LoaderError;
use crate::loader::{find_by_id, load_documents};
use std::time::Duration;

pub async fn execute(args: CloseArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };
    config.validate()?;

    let result = load_documents(&config.handoff_dir, &config.include)?;
    let doc = find_by_id(&result.documents, &args.handoff_id)
        .ok_or_else(|| LoaderError::NotFound(args.handoff_id.clone()))?;

    let ctx = ClosureContext {
        plans_dir: &config.plans_dir,
        report_dir: &config.report_dir,
        repo_dir: &config.target,
        outgoing_dir: &config.outgoing_dir,
        local_repo: &config.repo,
        default_commands: &config.verification_commands,
        timeout: Duration::from_secs(config.timeout_sec),
    };
    let runner = ShellVerifier {
        working_dir: config.target.clone(),
    };

    let outcome = close_handoff(&ctx, doc, &runner).await?;

    println!("Verification:");
    for result in &outcome.results {
        println!("  passed  `{}`", result.command);
    }
    println!("Closed {} (report: {})", doc.id(), outcome.report_path.display());

    Ok(())
}
