pub mod block;
pub mod close;
pub mod complete;
pub mod detect;
pub mod plan;
pub mod schema;
pub mod status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossdock")]
#[command(
    author,
    version,
    about = "Cross-repository handoff lifecycle engine: detect, plan, verify, close"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect new or edited handoffs since the last run
    Detect(DetectArgs),

    /// Generate a consumption plan from a handoff
    Plan(PlanArgs),

    /// Mark a plan requirement complete
    Complete(CompleteArgs),

    /// Verify and close a handoff
    Close(CloseArgs),

    /// Block a handoff and raise a blocker back to its origin
    Block(BlockArgs),

    /// Show handoffs and their plan progress
    Status(StatusArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct DetectArgs {
    /// Path to config file
    #[arg(short, long, default_value = "crossdock.yaml")]
    pub config: PathBuf,

    /// Report changes without updating the state file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    /// Handoff id to plan (e.g. 031-auth-tokens)
    pub handoff_id: String,

    /// Path to config file
    #[arg(short, long, default_value = "crossdock.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct CompleteArgs {
    /// Handoff id the plan belongs to
    pub handoff_id: String,

    /// Requirement id to mark complete (e.g. REQ-002)
    pub requirement: String,

    /// Path to config file
    #[arg(short, long, default_value = "crossdock.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct CloseArgs {
    /// Handoff id to close
    pub handoff_id: String,

    /// Path to config file
    #[arg(short, long, default_value = "crossdock.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct BlockArgs {
    /// Handoff id to block
    pub handoff_id: String,

    /// Why consumption cannot proceed
    #[arg(short, long)]
    pub reason: String,

    /// Path to config file
    #[arg(short, long, default_value = "crossdock.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct StatusArgs {
    /// Path to config file
    #[arg(short, long, default_value = "crossdock.yaml")]
    pub config: PathBuf,
}
