//! Consumption plan engine.
//!
//! A plan is derived once from a handoff, then driven through its own
//! status machine by the completion and closure workflows. Creation
//! refuses to overwrite an existing plan file; regeneration would
//! discard completion progress.

mod document;
mod status;

pub use document::{build_plan, parse_plan, ConsumptionPlan, ConsumptionPlanFrontmatter};
pub use status::{calculate_auto_status, is_valid_transition, PlanStatus};

use crate::error::PlanError;
use crate::extract::{extract_requirements, ExtractedRequirement};
use crate::handoff::HandoffDocument;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical plan path for a handoff id.
pub fn plan_path(plans_dir: &Path, handoff_id: &str) -> PathBuf {
    plans_dir.join(format!("{}-plan.md", handoff_id))
}

/// Extract requirements, build the plan, and write it to the canonical
/// path. Hard error if the plan file already exists.
pub fn create_plan_file(
    plans_dir: &Path,
    doc: &HandoffDocument,
) -> Result<(PathBuf, ConsumptionPlan), PlanError> {
    let path = plan_path(plans_dir, &doc.frontmatter.handoff_id);
    if path.exists() {
        return Err(PlanError::AlreadyExists { path });
    }

    let requirements = extract_requirements(doc);
    let plan = build_plan(doc, requirements);

    fs::create_dir_all(plans_dir)?;
    fs::write(&path, plan.to_markdown()?)?;

    Ok((path, plan))
}

/// Load the plan for a handoff id from its canonical path.
pub fn load_plan_file(plans_dir: &Path, handoff_id: &str) -> Result<ConsumptionPlan, PlanError> {
    let path = plan_path(plans_dir, handoff_id);
    if !path.exists() {
        return Err(PlanError::NotFound {
            handoff_id: handoff_id.to_string(),
            path,
        });
    }
    let content = fs::read_to_string(&path)?;
    parse_plan(&content)
}

/// Persist a plan back to its canonical path.
pub fn save_plan_file(plans_dir: &Path, plan: &ConsumptionPlan) -> Result<PathBuf, PlanError> {
    let path = plan_path(plans_dir, &plan.frontmatter.handoff_id);
    fs::write(&path, plan.to_markdown()?)?;
    Ok(path)
}

/// Pure completion transform: returns an updated requirement list with
/// the given requirement marked complete. The caller recomputes counts
/// and re-derives status before persisting.
pub fn mark_requirement_complete(
    requirements: &[ExtractedRequirement],
    req_id: &str,
) -> Result<Vec<ExtractedRequirement>, PlanError> {
    if !requirements.iter().any(|r| r.id == req_id) {
        return Err(PlanError::UnknownRequirement(req_id.to_string()));
    }

    Ok(requirements
        .iter()
        .cloned()
        .map(|mut req| {
            if req.id == req_id {
                req.completed = true;
            }
            req
        })
        .collect())
}

/// Apply a validated status move and bump `updated_at`.
pub fn apply_transition(plan: &mut ConsumptionPlan, to: PlanStatus) -> Result<(), PlanError> {
    let from = plan.frontmatter.status;
    if !is_valid_transition(from, to) {
        let allowed = if from.allowed_transitions().is_empty() {
            "none (terminal state)".to_string()
        } else {
            from.allowed_transitions()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(PlanError::Transition(format!(
            "cannot move plan from '{}' to '{}'; allowed: {}",
            from, to, allowed
        )));
    }

    plan.frontmatter.status = to;
    plan.frontmatter.updated_at = Utc::now();
    Ok(())
}

/// Walk the plan to `done` through table-legal hops
/// (testing -> review -> done, pending/blocked -> in_progress -> done).
pub fn advance_to_done(plan: &mut ConsumptionPlan) -> Result<(), PlanError> {
    while plan.frontmatter.status != PlanStatus::Done {
        let next = match plan.frontmatter.status {
            PlanStatus::Pending | PlanStatus::Blocked => PlanStatus::InProgress,
            PlanStatus::InProgress => PlanStatus::Done,
            PlanStatus::Testing => PlanStatus::Review,
            PlanStatus::Review => PlanStatus::Done,
            PlanStatus::Done => break,
        };
        apply_transition(plan, next)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::{HandoffFrontmatter, RequirementStub};
    use std::path::PathBuf;

    fn handoff() -> HandoffDocument {
        HandoffDocument {
            frontmatter: HandoffFrontmatter {
                handoff_id: "040-rate-limits".to_string(),
                direction: "incoming".to_string(),
                from_repo: "upstream".to_string(),
                to_repo: "local-repo".to_string(),
                created_at: "2026-03-01T12:00:00Z".to_string(),
                status: "new".to_string(),
                requires: vec![RequirementStub {
                    stub_type: "api".to_string(),
                    description: "add a new route".to_string(),
                }],
                ..Default::default()
            },
            body: String::new(),
            file_path: PathBuf::from("handoffs/incoming/040-rate-limits.md"),
        }
    }

    #[test]
    fn test_create_refuses_existing_plan() {
        let dir = tempfile::tempdir().unwrap();
        let doc = handoff();

        let (path, _) = create_plan_file(dir.path(), &doc).unwrap();
        assert!(path.exists());

        let err = create_plan_file(dir.path(), &doc).unwrap_err();
        match err {
            PlanError::AlreadyExists { path: p } => assert_eq!(p, path),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[test]
    fn test_create_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let doc = handoff();

        create_plan_file(dir.path(), &doc).unwrap();
        let plan = load_plan_file(dir.path(), "040-rate-limits").unwrap();

        assert_eq!(plan.frontmatter.handoff_id, "040-rate-limits");
        assert_eq!(plan.requirements.len(), 1);
        assert_eq!(plan.requirements[0].id, "REQ-001");
    }

    #[test]
    fn test_load_missing_plan() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_plan_file(dir.path(), "999-nope").unwrap_err();
        assert!(matches!(err, PlanError::NotFound { .. }));
    }

    #[test]
    fn test_mark_complete_is_pure() {
        let dir = tempfile::tempdir().unwrap();
        let (_, plan) = create_plan_file(dir.path(), &handoff()).unwrap();

        let updated = mark_requirement_complete(&plan.requirements, "REQ-001").unwrap();
        assert!(updated[0].completed);
        assert!(!plan.requirements[0].completed, "input list must be untouched");
    }

    #[test]
    fn test_mark_complete_unknown_id() {
        let err = mark_requirement_complete(&[], "REQ-404").unwrap_err();
        assert!(matches!(err, PlanError::UnknownRequirement(_)));
    }

    #[test]
    fn test_apply_transition_rejects_illegal_move() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut plan) = create_plan_file(dir.path(), &handoff()).unwrap();

        assert_eq!(plan.frontmatter.status, PlanStatus::Pending);
        let err = apply_transition(&mut plan, PlanStatus::Done).unwrap_err();
        assert!(err.to_string().contains("in_progress"));
        assert_eq!(plan.frontmatter.status, PlanStatus::Pending);
    }

    #[test]
    fn test_advance_to_done_from_testing() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut plan) = create_plan_file(dir.path(), &handoff()).unwrap();
        plan.frontmatter.status = PlanStatus::Testing;

        advance_to_done(&mut plan).unwrap();
        assert_eq!(plan.frontmatter.status, PlanStatus::Done);
    }

    #[test]
    fn test_advance_to_done_from_pending() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut plan) = create_plan_file(dir.path(), &handoff()).unwrap();

        advance_to_done(&mut plan).unwrap();
        assert_eq!(plan.frontmatter.status, PlanStatus::Done);
    }
}
