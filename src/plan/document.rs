//! Consumption plan document: build, serialize, parse.
//!
//! The serialized form is YAML frontmatter plus a markdown body whose
//! `## Requirements` checklist is the only machine-reparsed section.
//! Lines match `- [ ] **REQ-NNN**: description` (or `[x]`). Parsing a
//! plan back recovers requirement ids, descriptions, and completed
//! flags; category, tests, and files are advisory render-time detail
//! and are not recovered. For plans read from disk the original body is
//! kept and only the checklist marks are patched on re-serialization,
//! so the human-readable risk/test/file sections survive rewrites.

use crate::error::PlanError;
use crate::extract::{Category, ExtractedRequirement, RequirementSource};
use crate::handoff::HandoffDocument;
use crate::loader::frontmatter::{parse_frontmatter, serialize_frontmatter};
use crate::plan::status::{calculate_auto_status, PlanStatus};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionPlanFrontmatter {
    pub handoff_id: String,
    pub source_handoff: String,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub requirements_total: usize,
    pub requirements_done: usize,
    #[serde(default)]
    pub breaking_change: bool,
}

#[derive(Debug, Clone)]
pub struct ConsumptionPlan {
    pub frontmatter: ConsumptionPlanFrontmatter,
    pub summary: String,
    pub requirements: Vec<ExtractedRequirement>,
    pub risks: Vec<String>,
    pub test_plan: Vec<String>,
    pub impacted_files: Vec<String>,
    /// Raw body as read from disk; empty for freshly built plans.
    pub body: String,
}

/// Build a fresh plan from a handoff and its extracted requirements.
pub fn build_plan(doc: &HandoffDocument, requirements: Vec<ExtractedRequirement>) -> ConsumptionPlan {
    let now = Utc::now();
    let total = requirements.len();
    let done = requirements.iter().filter(|r| r.completed).count();

    let mut summary = format!(
        "Consumption of handoff {} ({} -> {}).",
        doc.frontmatter.handoff_id, doc.frontmatter.from_repo, doc.frontmatter.to_repo
    );
    if let Some(notes) = doc.frontmatter.notes.as_deref() {
        if !notes.trim().is_empty() {
            summary.push(' ');
            summary.push_str(notes.trim());
        }
    }

    let breaking_change = doc.body.to_lowercase().contains("breaking")
        || doc
            .frontmatter
            .risks
            .iter()
            .any(|r| r.to_lowercase().contains("breaking"));

    let mut test_plan = Vec::new();
    for req in &requirements {
        for test in &req.tests {
            if !test_plan.contains(test) {
                test_plan.push(test.clone());
            }
        }
    }
    for entry in &doc.frontmatter.verification {
        if !test_plan.contains(entry) {
            test_plan.push(entry.clone());
        }
    }

    let mut impacted_files = Vec::new();
    for req in &requirements {
        for file in &req.files {
            if !impacted_files.contains(file) {
                impacted_files.push(file.clone());
            }
        }
    }

    ConsumptionPlan {
        frontmatter: ConsumptionPlanFrontmatter {
            handoff_id: doc.frontmatter.handoff_id.clone(),
            source_handoff: doc.file_path.display().to_string(),
            status: calculate_auto_status(total, done),
            created_at: now,
            updated_at: now,
            requirements_total: total,
            requirements_done: done,
            breaking_change,
        },
        summary,
        requirements,
        risks: doc.frontmatter.risks.clone(),
        test_plan,
        impacted_files,
        body: String::new(),
    }
}

impl ConsumptionPlan {
    /// Recompute completion counts and re-derive status from them.
    /// Bumps `updated_at`.
    pub fn refresh_counts(&mut self) {
        self.frontmatter.requirements_total = self.requirements.len();
        self.frontmatter.requirements_done =
            self.requirements.iter().filter(|r| r.completed).count();
        self.frontmatter.status = calculate_auto_status(
            self.frontmatter.requirements_total,
            self.frontmatter.requirements_done,
        );
        self.frontmatter.updated_at = Utc::now();
    }

    pub fn to_markdown(&self) -> Result<String, PlanError> {
        let fm_value = serde_yaml::to_value(&self.frontmatter)?;
        let body = if self.body.is_empty() {
            self.render_body()
        } else {
            patch_checklist(&self.body, &self.requirements)
        };
        serialize_frontmatter(&fm_value, &body).map_err(|e| PlanError::Malformed(e.to_string()))
    }

    fn render_body(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Consumption Plan: {}\n\n", self.frontmatter.handoff_id));

        out.push_str("## Summary\n\n");
        out.push_str(&self.summary);
        out.push_str("\n\n");

        out.push_str("## Requirements\n\n");
        if self.requirements.is_empty() {
            out.push_str("No actionable requirements extracted.\n");
        }
        for req in &self.requirements {
            let mark = if req.completed { "x" } else { " " };
            out.push_str(&format!("- [{}] **{}**: {}\n", mark, req.id, req.description));
            out.push_str(&format!(
                "  - category: {} (priority {})\n",
                req.category, req.priority
            ));
            out.push_str(&format!("  - source: {}\n", req.source));
            if !req.tests.is_empty() {
                out.push_str(&format!("  - tests: {}\n", req.tests.join("; ")));
            }
            if !req.files.is_empty() {
                out.push_str(&format!("  - files: {}\n", req.files.join(", ")));
            }
        }
        out.push('\n');

        out.push_str("## Risks\n\n");
        if self.risks.is_empty() {
            out.push_str("No risks recorded.\n");
        }
        for risk in &self.risks {
            out.push_str(&format!("- {}\n", risk));
        }
        out.push('\n');

        out.push_str("## Test Plan\n\n");
        for entry in &self.test_plan {
            out.push_str(&format!("- {}\n", entry));
        }
        out.push('\n');

        out.push_str("## Impacted Files\n\n");
        for file in &self.impacted_files {
            out.push_str(&format!("- `{}`\n", file));
        }

        out
    }
}

fn checklist_regex() -> Regex {
    Regex::new(r"^\s*-\s*\[( |x)\]\s*\*\*(REQ-\d{3})\*\*:\s*(.+)$").expect("static regex")
}

/// Rewrite only the checklist marks of an existing body, leaving every
/// other line untouched.
fn patch_checklist(body: &str, requirements: &[ExtractedRequirement]) -> String {
    let re = checklist_regex();
    let mut lines: Vec<String> = Vec::new();

    for line in body.lines() {
        if let Some(caps) = re.captures(line) {
            let id = &caps[2];
            if let Some(req) = requirements.iter().find(|r| r.id == id) {
                let mark = if req.completed { "x" } else { " " };
                lines.push(format!("- [{}] **{}**: {}", mark, id, &caps[3]));
                continue;
            }
        }
        lines.push(line.to_string());
    }

    let mut out = lines.join("\n");
    if body.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Parse a previously written plan document.
pub fn parse_plan(content: &str) -> Result<ConsumptionPlan, PlanError> {
    let (fm_value, body) =
        parse_frontmatter(content).map_err(|e| PlanError::Malformed(e.to_string()))?;
    let frontmatter: ConsumptionPlanFrontmatter = serde_yaml::from_value(fm_value)?;

    let re = checklist_regex();
    let mut requirements = Vec::new();
    for (i, line) in body.lines().enumerate() {
        if let Some(caps) = re.captures(line) {
            let category = Category::ApiClient;
            requirements.push(ExtractedRequirement {
                id: caps[2].to_string(),
                priority: category.priority(),
                category,
                description: caps[3].trim().to_string(),
                source: RequirementSource::BodyLine(i + 1),
                completed: &caps[1] == "x",
                tests: Vec::new(),
                files: Vec::new(),
            });
        }
    }

    let summary = extract_section(&body, "## Summary");

    Ok(ConsumptionPlan {
        frontmatter,
        summary,
        requirements,
        risks: Vec::new(),
        test_plan: Vec::new(),
        impacted_files: Vec::new(),
        body,
    })
}

fn extract_section(body: &str, heading: &str) -> String {
    let mut in_section = false;
    let mut collected = Vec::new();

    for line in body.lines() {
        if line.trim() == heading {
            in_section = true;
            continue;
        }
        if in_section {
            if line.starts_with("## ") {
                break;
            }
            collected.push(line);
        }
    }

    collected.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_requirements;
    use crate::handoff::{HandoffFrontmatter, RequirementStub};
    use std::path::PathBuf;

    fn handoff() -> HandoffDocument {
        HandoffDocument {
            frontmatter: HandoffFrontmatter {
                handoff_id: "031-auth-tokens".to_string(),
                direction: "incoming".to_string(),
                from_repo: "upstream".to_string(),
                to_repo: "local-repo".to_string(),
                created_at: "2026-03-01T12:00:00Z".to_string(),
                status: "in_progress".to_string(),
                requires: vec![RequirementStub {
                    stub_type: "api".to_string(),
                    description: "add a new route".to_string(),
                }],
                risks: vec!["token rotation is a breaking change".to_string()],
                verification: vec!["cargo test".to_string()],
                ..Default::default()
            },
            body: "- [ ] update the users table schema\n".to_string(),
            file_path: PathBuf::from("handoffs/incoming/031-auth-tokens.md"),
        }
    }

    fn fresh_plan() -> ConsumptionPlan {
        let doc = handoff();
        let reqs = extract_requirements(&doc);
        build_plan(&doc, reqs)
    }

    #[test]
    fn test_build_plan_counts_and_status() {
        let plan = fresh_plan();
        assert_eq!(plan.frontmatter.handoff_id, "031-auth-tokens");
        assert_eq!(plan.frontmatter.requirements_total, 2);
        assert_eq!(plan.frontmatter.requirements_done, 0);
        assert_eq!(plan.frontmatter.status, PlanStatus::Pending);
        assert!(plan.frontmatter.breaking_change);
        assert!(plan.test_plan.contains(&"cargo test".to_string()));
    }

    #[test]
    fn test_round_trip_recovers_ids_and_completed_flags() {
        let mut plan = fresh_plan();
        plan.requirements[1].completed = true;
        plan.refresh_counts();

        let serialized = plan.to_markdown().unwrap();
        let parsed = parse_plan(&serialized).unwrap();

        let ids: Vec<_> = parsed.requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["REQ-001", "REQ-002"]);
        assert!(!parsed.requirements[0].completed);
        assert!(parsed.requirements[1].completed);
        assert_eq!(parsed.frontmatter.requirements_done, 1);
        assert_eq!(parsed.frontmatter.status, PlanStatus::InProgress);
    }

    #[test]
    fn test_round_trip_does_not_recover_advisory_metadata() {
        let plan = fresh_plan();
        let parsed = parse_plan(&plan.to_markdown().unwrap()).unwrap();

        for req in &parsed.requirements {
            assert_eq!(req.category, Category::ApiClient);
            assert!(req.tests.is_empty());
            assert!(req.files.is_empty());
        }
    }

    #[test]
    fn test_patch_preserves_prose_sections() {
        let plan = fresh_plan();
        let serialized = plan.to_markdown().unwrap();

        let mut reparsed = parse_plan(&serialized).unwrap();
        reparsed.requirements[0].completed = true;
        reparsed.refresh_counts();
        let rewritten = reparsed.to_markdown().unwrap();

        assert!(rewritten.contains("## Risks"));
        assert!(rewritten.contains("token rotation is a breaking change"));
        assert!(rewritten.contains("## Test Plan"));
        assert!(rewritten.contains("- [x] **REQ-001**"));
        assert!(rewritten.contains("- [ ] **REQ-002**"));
    }

    #[test]
    fn test_summary_survives_round_trip() {
        let plan = fresh_plan();
        let parsed = parse_plan(&plan.to_markdown().unwrap()).unwrap();
        assert!(parsed.summary.contains("031-auth-tokens"));
    }

    #[test]
    fn test_test_plan_checklist_lines_are_not_requirements() {
        // The test plan section renders plain bullets; only lines with
        // a bold REQ id count as requirements.
        let plan = fresh_plan();
        let parsed = parse_plan(&plan.to_markdown().unwrap()).unwrap();
        assert_eq!(parsed.requirements.len(), 2);
    }

    #[test]
    fn test_parse_rejects_missing_frontmatter() {
        assert!(parse_plan("# no frontmatter\n").is_err());
    }
}
