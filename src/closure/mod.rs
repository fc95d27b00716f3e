//! Closure engine: the two terminal paths of a handoff.
//!
//! A successful close is gated on the verification command set; a
//! failed command aborts before anything is written and the handoff is
//! left untouched. A block generates a new outgoing handoff addressed
//! back to the originating repository and back-references it from the
//! original. Both paths write a consumption report and degrade their
//! VCS statistics to empty on failure.

pub mod report;
pub mod verify;

pub use report::{ReportInput, ReportStatus};
pub use verify::{ShellVerifier, VerificationResult, VerificationRunner};

use crate::error::{ClosureError, PlanError};
use crate::handoff::{HandoffDocument, HandoffFrontmatter, HandoffStatus, RequirementStub};
use crate::loader::frontmatter::serialize_frontmatter;
use crate::loader::rewrite_frontmatter_fields;
use crate::plan::{advance_to_done, apply_transition, load_plan_file, save_plan_file, PlanStatus};
use crate::validator::check_handoff_transition;
use crate::vcs::gather_change_summary;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Shared closure configuration, resolved by the CLI layer.
pub struct ClosureContext<'a> {
    pub plans_dir: &'a Path,
    pub report_dir: &'a Path,
    pub repo_dir: &'a Path,
    pub outgoing_dir: &'a Path,
    pub local_repo: &'a str,
    pub default_commands: &'a [String],
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct CloseOutcome {
    pub report_path: PathBuf,
    pub results: Vec<VerificationResult>,
}

#[derive(Debug)]
pub struct BlockOutcome {
    pub blocker_id: String,
    pub blocker_path: PathBuf,
    pub report_path: PathBuf,
}

fn parsed_status(doc: &HandoffDocument) -> Result<HandoffStatus, ClosureError> {
    doc.frontmatter.status().ok_or_else(|| {
        ClosureError::Transition(format!(
            "handoff '{}' has unrecognized status '{}'",
            doc.id(),
            doc.frontmatter.status
        ))
    })
}

/// Timestamp bounding the VCS queries: the plan's creation time when a
/// plan exists, else the handoff's own, else now (yielding empty
/// statistics rather than unbounded history).
fn since_bound(
    plan_created: Option<DateTime<Utc>>,
    doc: &HandoffDocument,
) -> DateTime<Utc> {
    plan_created
        .or_else(|| doc.frontmatter.created_at())
        .unwrap_or_else(Utc::now)
}

/// Verification-gated successful closure.
pub async fn close_handoff(
    ctx: &ClosureContext<'_>,
    doc: &HandoffDocument,
    runner: &dyn VerificationRunner,
) -> Result<CloseOutcome, ClosureError> {
    let current = parsed_status(doc)?;
    check_handoff_transition(current, HandoffStatus::Done)
        .map_err(|e| ClosureError::Transition(e.to_string()))?;

    let commands: &[String] = if doc.frontmatter.verification.is_empty() {
        ctx.default_commands
    } else {
        &doc.frontmatter.verification
    };
    if commands.is_empty() {
        return Err(ClosureError::NoVerificationCommands);
    }

    let results = verify::run_all(runner, commands, ctx.timeout).await?;
    if let Some(failed) = results.iter().find(|r| !r.passed) {
        let detail = if failed.stderr.trim().is_empty() {
            failed.stdout.trim().to_string()
        } else {
            failed.stderr.trim().to_string()
        };
        return Err(ClosureError::VerificationFailed {
            command: failed.command.clone(),
            detail,
        });
    }

    let mut plan = match load_plan_file(ctx.plans_dir, doc.id()) {
        Ok(plan) => Some(plan),
        Err(PlanError::NotFound { .. }) => {
            warn!("No plan on file for '{}'; closing without one", doc.id());
            None
        }
        Err(e) => return Err(e.into()),
    };

    let since = since_bound(plan.as_ref().map(|p| p.frontmatter.created_at), doc);
    let summary = gather_change_summary(ctx.repo_dir, since);

    let report_path = report::write_report(
        ctx.report_dir,
        &ReportInput {
            handoff_id: doc.id(),
            status: ReportStatus::Done,
            summary: &summary,
            verification: &results,
            blocker_handoff: None,
            blocker_reason: None,
        },
    )?;

    rewrite_frontmatter_fields(
        &doc.file_path,
        &[(
            "status",
            serde_yaml::Value::String(HandoffStatus::Done.to_string()),
        )],
    )?;

    if let Some(ref mut plan) = plan {
        advance_to_done(plan)?;
        save_plan_file(ctx.plans_dir, plan)?;
    }

    info!("Closed handoff '{}' with {} commits recorded", doc.id(), summary.commits.len());

    Ok(CloseOutcome {
        report_path,
        results,
    })
}

/// Block the handoff: emit a blocker handoff back to the originating
/// repository, back-reference it, and write a blocked report.
pub fn block_handoff(
    ctx: &ClosureContext<'_>,
    doc: &HandoffDocument,
    corpus: &[HandoffDocument],
    reason: &str,
) -> Result<BlockOutcome, ClosureError> {
    let current = parsed_status(doc)?;
    check_handoff_transition(current, HandoffStatus::Blocked)
        .map_err(|e| ClosureError::Transition(e.to_string()))?;

    let blocker_id = next_outgoing_id(corpus, doc.id());
    let blocker_path = write_blocker_handoff(ctx, doc, &blocker_id, reason)?;

    rewrite_frontmatter_fields(
        &doc.file_path,
        &[
            (
                "status",
                serde_yaml::Value::String(HandoffStatus::Blocked.to_string()),
            ),
            (
                "blocker_reason",
                serde_yaml::Value::String(reason.to_string()),
            ),
            (
                "blocker_handoff",
                serde_yaml::Value::String(blocker_id.clone()),
            ),
        ],
    )?;

    let plan = match load_plan_file(ctx.plans_dir, doc.id()) {
        Ok(mut plan) => {
            if apply_transition(&mut plan, PlanStatus::Blocked).is_ok() {
                save_plan_file(ctx.plans_dir, &plan)?;
            } else {
                warn!(
                    "Plan for '{}' is '{}'; leaving its status untouched",
                    doc.id(),
                    plan.frontmatter.status
                );
            }
            Some(plan)
        }
        Err(PlanError::NotFound { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    let since = since_bound(plan.as_ref().map(|p| p.frontmatter.created_at), doc);
    let summary = gather_change_summary(ctx.repo_dir, since);

    let report_path = report::write_report(
        ctx.report_dir,
        &ReportInput {
            handoff_id: doc.id(),
            status: ReportStatus::Blocked,
            summary: &summary,
            verification: &[],
            blocker_handoff: Some(&blocker_id),
            blocker_reason: Some(reason),
        },
    )?;

    info!("Blocked handoff '{}'; raised '{}'", doc.id(), blocker_id);

    Ok(BlockOutcome {
        blocker_id,
        blocker_path,
        report_path,
    })
}

/// Next free outgoing id: highest numeric prefix in the corpus plus
/// one, with a slug tying it back to the source handoff.
fn next_outgoing_id(corpus: &[HandoffDocument], source_id: &str) -> String {
    let max = corpus
        .iter()
        .filter_map(|doc| doc.id().get(..3).and_then(|n| n.parse::<u32>().ok()))
        .max()
        .unwrap_or(0);

    let slug = source_id.split_once('-').map(|(_, s)| s).unwrap_or("handoff");
    format!("{:03}-unblock-{}", max + 1, slug)
}

fn write_blocker_handoff(
    ctx: &ClosureContext<'_>,
    doc: &HandoffDocument,
    blocker_id: &str,
    reason: &str,
) -> Result<PathBuf, ClosureError> {
    let frontmatter = HandoffFrontmatter {
        handoff_id: blocker_id.to_string(),
        direction: "outgoing".to_string(),
        from_repo: ctx.local_repo.to_string(),
        to_repo: doc.frontmatter.from_repo.clone(),
        created_at: Utc::now().to_rfc3339(),
        status: HandoffStatus::New.to_string(),
        requires: vec![RequirementStub {
            stub_type: "blocker".to_string(),
            description: reason.to_string(),
        }],
        notes: Some(format!("Raised while consuming handoff {}.", doc.id())),
        ..Default::default()
    };

    let body = format!(
        "# Blocker for {}\n\nConsumption of `{}` in `{}` is blocked.\n\nReason: {}\n\n- [ ] resolve the blocker described above\n",
        doc.id(),
        doc.id(),
        ctx.local_repo,
        reason
    );

    let fm_value = serde_yaml::to_value(&frontmatter)?;
    let content = serialize_frontmatter(&fm_value, &body)?;

    fs::create_dir_all(ctx.outgoing_dir)?;
    let path = ctx.outgoing_dir.join(format!("{}.md", blocker_id));
    fs::write(&path, content)?;
    Ok(path)
}
