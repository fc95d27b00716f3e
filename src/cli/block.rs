//! CLI handler for the `block` subcommand.

use crate::cli::BlockArgs;
use crate::closure::{block_handoff, ClosureContext};
use crate::config::Config;
use crate::error::LoaderError;
use crate::loader::{find_by_id, load_documents};
use std::time::Duration;

pub fn execute(args: BlockArgs) -> anyhow::Result<()> {
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

    let outcome = block_handoff(&ctx, doc, &result.documents, &args.reason)?;

    println!(
        "Blocked {}; raised {} ({})",
        doc.id(),
        outcome.blocker_id,
        outcome.blocker_path.display()
    );
    println!("Report: {}", outcome.report_path.display());

    Ok(())
}
