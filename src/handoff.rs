//! Handoff document model.
//!
//! Frontmatter fields are kept as plain strings at the parse edge so a
//! half-filled document still loads; the validator turns missing or
//! malformed fields into `ValidationError` values instead of the parser
//! rejecting the file outright. Typed accessors cover the enum-shaped
//! fields for everything downstream of validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which way a handoff flows relative to the local repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Incoming => write!(f, "incoming"),
            Direction::Outgoing => write!(f, "outgoing"),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(Direction::Incoming),
            "outgoing" => Ok(Direction::Outgoing),
            _ => Err(()),
        }
    }
}

/// Lifecycle status of a handoff document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    New,
    Acknowledged,
    InProgress,
    Done,
    Blocked,
}

impl HandoffStatus {
    pub const ALL: [HandoffStatus; 5] = [
        HandoffStatus::New,
        HandoffStatus::Acknowledged,
        HandoffStatus::InProgress,
        HandoffStatus::Done,
        HandoffStatus::Blocked,
    ];

    /// Legal targets for a non-identity move. `done` is terminal.
    pub fn allowed_transitions(self) -> &'static [HandoffStatus] {
        match self {
            HandoffStatus::New => &[
                HandoffStatus::Acknowledged,
                HandoffStatus::InProgress,
                HandoffStatus::Blocked,
            ],
            HandoffStatus::Acknowledged => {
                &[HandoffStatus::InProgress, HandoffStatus::Blocked]
            }
            HandoffStatus::InProgress => &[HandoffStatus::Done, HandoffStatus::Blocked],
            HandoffStatus::Done => &[],
            HandoffStatus::Blocked => &[HandoffStatus::InProgress],
        }
    }
}

impl std::fmt::Display for HandoffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandoffStatus::New => write!(f, "new"),
            HandoffStatus::Acknowledged => write!(f, "acknowledged"),
            HandoffStatus::InProgress => write!(f, "in_progress"),
            HandoffStatus::Done => write!(f, "done"),
            HandoffStatus::Blocked => write!(f, "blocked"),
        }
    }
}

impl FromStr for HandoffStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(HandoffStatus::New),
            "acknowledged" => Ok(HandoffStatus::Acknowledged),
            "in_progress" => Ok(HandoffStatus::InProgress),
            "done" => Ok(HandoffStatus::Done),
            "blocked" => Ok(HandoffStatus::Blocked),
            _ => Err(()),
        }
    }
}

/// A typed requirement stub from the `requires` frontmatter array.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RequirementStub {
    #[serde(default, rename = "type")]
    pub stub_type: String,

    #[serde(default)]
    pub description: String,
}

/// Parsed handoff frontmatter. Every field defaults so partially filled
/// documents still load; the validator reports what is missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HandoffFrontmatter {
    #[serde(default)]
    pub handoff_id: String,

    #[serde(default)]
    pub direction: String,

    #[serde(default)]
    pub from_repo: String,

    #[serde(default)]
    pub to_repo: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<RequirementStub>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocker_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocker_handoff: Option<String>,
}

impl HandoffFrontmatter {
    pub fn status(&self) -> Option<HandoffStatus> {
        self.status.parse().ok()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction.parse().ok()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A loaded handoff document. Immutable once parsed within a run.
#[derive(Debug, Clone)]
pub struct HandoffDocument {
    pub frontmatter: HandoffFrontmatter,
    pub body: String,
    pub file_path: PathBuf,
}

impl HandoffDocument {
    pub fn id(&self) -> &str {
        &self.frontmatter.handoff_id
    }
}
