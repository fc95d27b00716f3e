use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod closure;
mod config;
mod error;
mod extract;
mod handoff;
mod loader;
mod plan;
mod state;
mod validator;
mod vcs;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("crossdock=debug")
    } else {
        EnvFilter::new("crossdock=warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Detect(args) => cli::detect::execute(args),
        Commands::Plan(args) => cli::plan::execute(args),
        Commands::Complete(args) => cli::complete::execute(args),
        Commands::Close(args) => cli::close::execute(args).await,
        Commands::Block(args) => cli::block::execute(args),
        Commands::Status(args) => cli::status::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}
