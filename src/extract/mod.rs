//! Requirement extraction from handoff documents.
//!
//! Actionable items are mined from the `requires[]` and `acceptance[]`
//! frontmatter arrays and from the body text, categorized, and returned
//! sorted by priority. Requirement ids are assigned to the sorted list,
//! so `REQ-001` is always the highest-priority item of the run.

mod categorize;

pub use categorize::{categorize, Category};

use crate::handoff::HandoffDocument;
use regex::Regex;

/// Where a requirement was mined from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementSource {
    /// A frontmatter field path such as `requires[0]`.
    Frontmatter(String),
    /// A 1-based line number in the document body.
    BodyLine(usize),
}

impl std::fmt::Display for RequirementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementSource::Frontmatter(path) => write!(f, "{}", path),
            RequirementSource::BodyLine(line) => write!(f, "line {}", line),
        }
    }
}

/// One actionable requirement extracted from a handoff.
#[derive(Debug, Clone)]
pub struct ExtractedRequirement {
    pub id: String,
    pub category: Category,
    pub description: String,
    pub source: RequirementSource,
    pub priority: u8,
    pub completed: bool,
    pub tests: Vec<String>,
    pub files: Vec<String>,
}

impl ExtractedRequirement {
    fn from_mined(description: String, source: RequirementSource, completed: bool) -> Self {
        let category = categorize(&description);
        Self {
            id: String::new(),
            priority: category.priority(),
            tests: category.inferred_tests().iter().map(|s| s.to_string()).collect(),
            files: category.inferred_files().iter().map(|s| s.to_string()).collect(),
            category,
            description,
            source,
            completed,
        }
    }
}

/// Extract requirements from a handoff document.
///
/// Extraction order before sorting: `requires[]` entries, then
/// `acceptance[]` entries, then body-line matches, each in source
/// order. The result is sorted ascending by priority (stable, so ties
/// keep extraction order) and numbered `REQ-001…` in sorted order.
pub fn extract_requirements(doc: &HandoffDocument) -> Vec<ExtractedRequirement> {
    let mut requirements = Vec::new();

    for (i, stub) in doc.frontmatter.requires.iter().enumerate() {
        if stub.description.trim().is_empty() {
            continue;
        }
        requirements.push(ExtractedRequirement::from_mined(
            stub.description.trim().to_string(),
            RequirementSource::Frontmatter(format!("requires[{}]", i)),
            false,
        ));
    }

    for (i, entry) in doc.frontmatter.acceptance.iter().enumerate() {
        if entry.trim().is_empty() {
            continue;
        }
        requirements.push(ExtractedRequirement::from_mined(
            entry.trim().to_string(),
            RequirementSource::Frontmatter(format!("acceptance[{}]", i)),
            false,
        ));
    }

    requirements.extend(mine_body(&doc.body));

    requirements.sort_by_key(|req| req.priority);

    for (i, req) in requirements.iter_mut().enumerate() {
        req.id = format!("REQ-{:03}", i + 1);
    }

    requirements
}

/// Mine actionable lines from body text. Three patterns are checked
/// per line, first match wins, so a line is never mined twice:
/// checklist items, numbered items containing a requirement modal, and
/// recognized `Prefix:` lines.
fn mine_body(body: &str) -> Vec<ExtractedRequirement> {
    let checklist_re = Regex::new(r"^\s*-\s*\[( |x)\]\s+(.+)$").expect("static regex");
    let numbered_re = Regex::new(r"^\s*\d+[.)]\s+(.+)$").expect("static regex");
    let modal_re = Regex::new(r"(?i)(must|should|shall|need)").expect("static regex");
    let prefix_re =
        Regex::new(r"^(?:Requirement|REQ|Task|TODO|Action):\s*(.+)$").expect("static regex");

    let mut mined = Vec::new();

    for (i, line) in body.lines().enumerate() {
        let line_no = i + 1;
        if line.trim() == "---" {
            continue;
        }

        if let Some(caps) = checklist_re.captures(line) {
            let completed = &caps[1] == "x";
            mined.push(ExtractedRequirement::from_mined(
                caps[2].trim().to_string(),
                RequirementSource::BodyLine(line_no),
                completed,
            ));
            continue;
        }

        if let Some(caps) = numbered_re.captures(line) {
            let text = caps[1].trim();
            if modal_re.is_match(text) {
                mined.push(ExtractedRequirement::from_mined(
                    text.to_string(),
                    RequirementSource::BodyLine(line_no),
                    false,
                ));
            }
            continue;
        }

        if let Some(caps) = prefix_re.captures(line.trim_start()) {
            mined.push(ExtractedRequirement::from_mined(
                caps[1].trim().to_string(),
                RequirementSource::BodyLine(line_no),
                false,
            ));
        }
    }

    mined
}
