use std::path::PathBuf;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum CrossdockError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Closure error: {0}")]
    Closure(#[from] ClosureError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("Vcs error: {0}")]
    Vcs(#[from] VcsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No local repo identity configured (set 'repo' in crossdock.yaml)")]
    NoRepoIdentity,
}

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("missing opening frontmatter delimiter")]
    MissingOpen,

    #[error("missing closing frontmatter delimiter")]
    MissingClose,

    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to build glob pattern '{pattern}': {source}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Frontmatter error in '{path}': {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("No handoff found with id '{0}'")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan already exists at '{path}'; regenerating would discard completion progress")]
    AlreadyExists { path: PathBuf },

    #[error("No plan found for handoff '{handoff_id}' (expected at '{path}')")]
    NotFound { handoff_id: String, path: PathBuf },

    #[error("No requirement with id '{0}' in plan")]
    UnknownRequirement(String),

    #[error("Plan document is malformed: {0}")]
    Malformed(String),

    #[error("Illegal plan transition: {0}")]
    Transition(String),

    #[error("Failed to parse plan frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ClosureError {
    #[error("Verification failed for '{command}': {detail}; closure aborted")]
    VerificationFailed { command: String, detail: String },

    #[error("No verification commands available; a close must be evidenced")]
    NoVerificationCommands,

    #[error("Illegal status transition: {0}")]
    Transition(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git query failed: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
