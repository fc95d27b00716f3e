use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Identity of the local repository; matched against the
    /// `from_repo`/`to_repo` fields of handoff documents.
    #[serde(default)]
    pub repo: String,

    /// Working tree the tool operates in (git queries run here).
    #[serde(default = "default_target")]
    pub target: PathBuf,

    /// Directory holding handoff documents (walked recursively).
    #[serde(default = "default_handoff_dir")]
    pub handoff_dir: PathBuf,

    /// Where generated outgoing (blocker) handoffs are written.
    #[serde(default = "default_outgoing_dir")]
    pub outgoing_dir: PathBuf,

    #[serde(default = "default_plans_dir")]
    pub plans_dir: PathBuf,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Detection state file; a cache, safe to delete.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Include globs applied to paths under `handoff_dir`.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Fallback verification commands for handoffs that do not carry
    /// their own `verification` entries.
    #[serde(default)]
    pub verification_commands: Vec<String>,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}
