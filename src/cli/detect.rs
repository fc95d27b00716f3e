//! CLI handler for the `detect` subcommand.
//!
//! Loads the corpus, validates it, diffs against the persisted state,
//! and rewrites the state wholesale.

use crate::cli::DetectArgs;
use crate::config::Config;
use crate::loader::load_documents;
use crate::state::{FileStateStore, HandoffState, StateStore};
use crate::validator::validate_corpus;
use tracing::info;

pub fn execute(args: DetectArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        info!("Loading config from {:?}", args.config);
        Config::load(&args.config)?
    } else {
        info!("No config found, using defaults");
        Config::default()
    };
    config.validate()?;

    let result = load_documents(&config.handoff_dir, &config.include)?;

    let mut errors = result.errors.clone();
    errors.extend(validate_corpus(&result.documents, &config.repo));

    if !errors.is_empty() {
        println!("Validation problems ({}):", errors.len());
        for error in &errors {
            println!("  {}", error);
        }
        println!();
    }

    let store = FileStateStore::new(&config.state_file);
    let state = store.load();
    let new_docs = state.detect_new(&result.documents);

    println!(
        "{} handoffs loaded, {} new since last run",
        result.documents.len(),
        new_docs.len()
    );

    for doc in &new_docs {
        println!(
            "  NEW  {}  {:<8}  {:<12}  {}",
            doc.id(),
            doc.frontmatter.direction,
            doc.frontmatter.status,
            doc.file_path.display()
        );
    }

    if args.dry_run {
        info!("Dry run; state file left untouched");
        return Ok(());
    }

    store.save(&HandoffState::rebuild_from(&result.documents));

    Ok(())
}
