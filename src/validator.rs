//! Structural and cross-field validation for handoff documents.
//!
//! Validation never throws: every check appends a `ValidationError`
//! value and the full list is returned, so one bad document does not
//! hide problems in another. Checks are independent and not
//! short-circuited.

use crate::handoff::{Direction, HandoffDocument, HandoffStatus};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod codes {
    pub const MISSING_FIELD: &str = "missing_field";
    pub const INVALID_ID_FORMAT: &str = "invalid_id_format";
    pub const INVALID_STATUS: &str = "invalid_status";
    pub const INVALID_DIRECTION: &str = "invalid_direction";
    pub const DIRECTION_MISMATCH: &str = "direction_mismatch";
    pub const DUPLICATE_ID: &str = "duplicate_id";
    pub const PARSE_ERROR: &str = "parse_error";
}

/// A single validation problem, carried as a value rather than thrown.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub file: PathBuf,
    pub field: Option<String>,
    pub message: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        file: impl Into<PathBuf>,
        field: Option<&str>,
        message: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            file: file.into(),
            field: field.map(str::to_string),
            message: message.into(),
            code,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "{}: [{}] {} (field: {})",
                self.file.display(),
                self.code,
                self.message,
                field
            ),
            None => write!(f, "{}: [{}] {}", self.file.display(), self.code, self.message),
        }
    }
}

/// Illegal status move, with the allowed set for the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: HandoffStatus,
    pub to: HandoffStatus,
    pub allowed: Vec<HandoffStatus>,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let allowed = if self.allowed.is_empty() {
            "none (terminal state)".to_string()
        } else {
            self.allowed
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "cannot move handoff from '{}' to '{}'; allowed: {}",
            self.from, self.to, allowed
        )
    }
}

/// Check a handoff status move. Identity transitions are always legal;
/// anything else must appear in the from-status's allowed set.
pub fn check_handoff_transition(
    from: HandoffStatus,
    to: HandoffStatus,
) -> Result<(), TransitionError> {
    if from == to || from.allowed_transitions().contains(&to) {
        return Ok(());
    }
    Err(TransitionError {
        from,
        to,
        allowed: from.allowed_transitions().to_vec(),
    })
}

/// Validate one document's frontmatter against the local repo identity.
pub fn validate_document(doc: &HandoffDocument, local_repo: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let fm = &doc.frontmatter;
    let file = &doc.file_path;

    let required: [(&str, &str); 6] = [
        ("handoff_id", &fm.handoff_id),
        ("direction", &fm.direction),
        ("from_repo", &fm.from_repo),
        ("to_repo", &fm.to_repo),
        ("created_at", &fm.created_at),
        ("status", &fm.status),
    ];
    for (name, value) in required {
        if value.is_empty() {
            errors.push(ValidationError::new(
                file,
                Some(name),
                format!("required field '{}' is missing or empty", name),
                codes::MISSING_FIELD,
            ));
        }
    }

    if !fm.handoff_id.is_empty() {
        let id_re = Regex::new(r"^\d{3}-[a-z][a-z0-9-]*$").expect("static regex");
        if !id_re.is_match(&fm.handoff_id) {
            errors.push(ValidationError::new(
                file,
                Some("handoff_id"),
                format!(
                    "handoff_id '{}' does not match NNN-slug format",
                    fm.handoff_id
                ),
                codes::INVALID_ID_FORMAT,
            ));
        }
    }

    if !fm.status.is_empty() && fm.status().is_none() {
        let known = HandoffStatus::ALL
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(ValidationError::new(
            file,
            Some("status"),
            format!("status '{}' is not one of: {}", fm.status, known),
            codes::INVALID_STATUS,
        ));
    }

    if !fm.direction.is_empty() && fm.direction().is_none() {
        errors.push(ValidationError::new(
            file,
            Some("direction"),
            format!("direction '{}' is not 'incoming' or 'outgoing'", fm.direction),
            codes::INVALID_DIRECTION,
        ));
    }

    // Cross-field rules, one error per violated rule.
    match fm.direction() {
        Some(Direction::Outgoing) if fm.from_repo != local_repo && !fm.from_repo.is_empty() => {
            errors.push(ValidationError::new(
                file,
                Some("from_repo"),
                format!(
                    "outgoing handoff must originate from '{}' but from_repo is '{}'",
                    local_repo, fm.from_repo
                ),
                codes::DIRECTION_MISMATCH,
            ));
        }
        Some(Direction::Incoming) if fm.to_repo != local_repo && !fm.to_repo.is_empty() => {
            errors.push(ValidationError::new(
                file,
                Some("to_repo"),
                format!(
                    "incoming handoff must target '{}' but to_repo is '{}'",
                    local_repo, fm.to_repo
                ),
                codes::DIRECTION_MISMATCH,
            ));
        }
        _ => {}
    }

    errors
}

/// Validate the whole loaded corpus: per-document checks plus
/// duplicate-id detection across documents. Every file in a duplicate
/// group gets its own error naming the sibling paths, so each offending
/// document can be flagged independently.
pub fn validate_corpus(docs: &[HandoffDocument], local_repo: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for doc in docs {
        errors.extend(validate_document(doc, local_repo));
    }

    let mut by_id: BTreeMap<&str, Vec<&HandoffDocument>> = BTreeMap::new();
    for doc in docs {
        if !doc.frontmatter.handoff_id.is_empty() {
            by_id.entry(doc.id()).or_default().push(doc);
        }
    }

    for (id, group) in by_id {
        if group.len() < 2 {
            continue;
        }
        for doc in &group {
            let siblings: Vec<String> = group
                .iter()
                .filter(|other| other.file_path != doc.file_path)
                .map(|other| other.file_path.display().to_string())
                .collect();
            errors.push(ValidationError::new(
                &doc.file_path,
                Some("handoff_id"),
                format!(
                    "duplicate handoff_id '{}' also used by: {}",
                    id,
                    siblings.join(", ")
                ),
                codes::DUPLICATE_ID,
            ));
        }
    }

    errors
}
