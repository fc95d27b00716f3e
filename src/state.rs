//! Cross-run detection state.
//!
//! The state file is a cache, not a source of truth: loading never
//! fails (a missing or unreadable file is an empty state) and a failed
//! save is logged and swallowed. Every detection run rebuilds the seen
//! map wholesale from the current corpus, so entries for deleted
//! handoffs drop out without explicit tombstoning.

use crate::handoff::HandoffDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct HandoffState {
    pub version: u32,

    #[serde(rename = "lastRun")]
    pub last_run: DateTime<Utc>,

    #[serde(default)]
    pub seen: HashMap<String, SeenEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenEntry {
    pub status: String,
    pub last_seen: DateTime<Utc>,
    pub content_hash: String,
}

impl Default for HandoffState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            last_run: Utc::now(),
            seen: HashMap::new(),
        }
    }
}

impl HandoffState {
    /// Rebuild the seen map from the current corpus and stamp the run.
    pub fn rebuild_from(docs: &[HandoffDocument]) -> Self {
        let now = Utc::now();
        let seen = docs
            .iter()
            .filter(|doc| !doc.frontmatter.handoff_id.is_empty())
            .map(|doc| {
                (
                    doc.id().to_string(),
                    SeenEntry {
                        status: doc.frontmatter.status.clone(),
                        last_seen: now,
                        content_hash: content_hash(&doc.body),
                    },
                )
            })
            .collect();

        Self {
            version: STATE_VERSION,
            last_run: now,
            seen,
        }
    }

    /// A document is new since the last run iff its id has no prior
    /// entry or the stored hash differs from the current body hash.
    /// Edited documents re-notify even when the id is unchanged.
    pub fn is_new(&self, doc: &HandoffDocument) -> bool {
        match self.seen.get(doc.id()) {
            None => true,
            Some(entry) => entry.content_hash != content_hash(&doc.body),
        }
    }

    /// Filter the corpus down to documents new since the last run.
    pub fn detect_new<'a>(&self, docs: &'a [HandoffDocument]) -> Vec<&'a HandoffDocument> {
        docs.iter().filter(|doc| self.is_new(doc)).collect()
    }
}

/// Short content digest of a document body: SHA-256, first 12 hex
/// characters. Deterministic, and enough entropy for a human-scale
/// corpus of handoff documents.
pub fn content_hash(body: &str) -> String {
    let hash = Sha256::digest(body.as_bytes());
    format!("{:x}", hash)[..12].to_string()
}

/// Persistence seam for the detection state. Injected so the tracker
/// is testable without a filesystem.
pub trait StateStore {
    fn load(&self) -> HandoffState;
    fn save(&self, state: &HandoffState);
}

/// File-backed store over the configured state path.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> HandoffState {
        if !self.path.exists() {
            return HandoffState::default();
        }

        let state: HandoffState = match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => HandoffState::default(),
        };

        if state.version != STATE_VERSION {
            warn!(
                "State file {} has version {} (expected {}); continuing anyway",
                self.path.display(),
                state.version,
                STATE_VERSION
            );
        }

        state
    }

    fn save(&self, state: &HandoffState) {
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let json = serde_json::to_string_pretty(state)?;
            fs::write(&self.path, json)
        })();

        if let Err(e) = result {
            warn!("Failed to save state to {}: {}", self.path.display(), e);
        }
    }
}
