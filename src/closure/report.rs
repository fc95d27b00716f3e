//! Consumption report documents.
//!
//! A report is a write-only artifact produced at closure (success or
//! block). The frontmatter is the machine-readable part; the body is
//! for humans and is never reparsed.

use super::verify::VerificationResult;
use crate::error::ClosureError;
use crate::loader::frontmatter::serialize_frontmatter;
use crate::vcs::ChangeSummary;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Done,
    Blocked,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Done => write!(f, "done"),
            ReportStatus::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportFrontmatter {
    pub handoff_id: String,
    pub status: ReportStatus,
    pub completed_at: DateTime<Utc>,
    pub related_commits: Vec<String>,
    pub related_prs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocker_handoff: Option<String>,
}

/// Pull PR references like `(#123)` out of commit subjects.
pub fn extract_pr_refs(summary: &ChangeSummary) -> Vec<String> {
    let re = Regex::new(r"#(\d+)").expect("static regex");
    let mut refs = Vec::new();
    for commit in &summary.commits {
        for caps in re.captures_iter(&commit.subject) {
            let pr = format!("#{}", &caps[1]);
            if !refs.contains(&pr) {
                refs.push(pr);
            }
        }
    }
    refs
}

pub struct ReportInput<'a> {
    pub handoff_id: &'a str,
    pub status: ReportStatus,
    pub summary: &'a ChangeSummary,
    pub verification: &'a [VerificationResult],
    pub blocker_handoff: Option<&'a str>,
    pub blocker_reason: Option<&'a str>,
}

/// Write the report to `<report_dir>/<handoff_id>-report.md`.
pub fn write_report(report_dir: &Path, input: &ReportInput<'_>) -> Result<PathBuf, ClosureError> {
    fs::create_dir_all(report_dir)?;

    let frontmatter = ReportFrontmatter {
        handoff_id: input.handoff_id.to_string(),
        status: input.status,
        completed_at: Utc::now(),
        related_commits: input.summary.commits.iter().map(|c| c.hash.clone()).collect(),
        related_prs: extract_pr_refs(input.summary),
        blocker_handoff: input.blocker_handoff.map(str::to_string),
    };

    let body = render_body(input);
    let fm_value = serde_yaml::to_value(&frontmatter)?;
    let content = serialize_frontmatter(&fm_value, &body)?;

    let path = report_dir.join(format!("{}-report.md", input.handoff_id));
    fs::write(&path, content)?;
    Ok(path)
}

fn render_body(input: &ReportInput<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Consumption Report: {} ({})\n\n",
        input.handoff_id, input.status
    ));

    if let Some(reason) = input.blocker_reason {
        out.push_str("## Blocker\n\n");
        out.push_str(&format!("{}\n", reason));
        if let Some(blocker) = input.blocker_handoff {
            out.push_str(&format!("\nTracked by outgoing handoff `{}`.\n", blocker));
        }
        out.push('\n');
    }

    if !input.verification.is_empty() {
        out.push_str("## Verification\n\n");
        out.push_str("| Command | Result |\n");
        out.push_str("|---------|--------|\n");
        for result in input.verification {
            let mark = if result.passed { "passed" } else { "failed" };
            out.push_str(&format!("| `{}` | {} |\n", result.command, mark));
        }
        out.push('\n');
    }

    out.push_str("## Commits\n\n");
    if input.summary.commits.is_empty() {
        out.push_str("No commits recorded.\n");
    }
    for commit in &input.summary.commits {
        out.push_str(&format!("- `{}` {}\n", commit.hash, commit.subject));
    }
    out.push('\n');

    if !input.summary.files.is_empty() {
        out.push_str("## Changed Files\n\n");
        for file in &input.summary.files {
            out.push_str(&format!("- `{}`\n", file.display()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::CommitInfo;

    fn summary() -> ChangeSummary {
        ChangeSummary {
            commits: vec![
                CommitInfo {
                    hash: "abc1234".to_string(),
                    subject: "Add refresh endpoint (#42)".to_string(),
                },
                CommitInfo {
                    hash: "def5678".to_string(),
                    subject: "Tighten validation (#42) (#43)".to_string(),
                },
            ],
            files: vec![PathBuf::from("src/api.rs")],
        }
    }

    #[test]
    fn test_extract_pr_refs_dedupes() {
        let refs = extract_pr_refs(&summary());
        assert_eq!(refs, vec!["#42", "#43"]);
    }

    #[test]
    fn test_write_done_report() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summary();
        let verification = vec![VerificationResult {
            command: "cargo test".to_string(),
            passed: true,
            stdout: String::new(),
            stderr: String::new(),
        }];

        let path = write_report(
            dir.path(),
            &ReportInput {
                handoff_id: "031-auth",
                status: ReportStatus::Done,
                summary: &summary,
                verification: &verification,
                blocker_handoff: None,
                blocker_reason: None,
            },
        )
        .unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("status: done"));
        assert!(content.contains("abc1234"));
        assert!(content.contains("'#42'") || content.contains("\"#42\"") || content.contains("#42"));
        assert!(content.contains("| `cargo test` | passed |"));
        assert!(!content.contains("blocker_handoff"));
    }

    #[test]
    fn test_write_blocked_report() {
        let dir = tempfile::tempdir().unwrap();
        let summary = ChangeSummary::default();

        let path = write_report(
            dir.path(),
            &ReportInput {
                handoff_id: "031-auth",
                status: ReportStatus::Blocked,
                summary: &summary,
                verification: &[],
                blocker_handoff: Some("045-unblock-auth"),
                blocker_reason: Some("upstream schema not published"),
            },
        )
        .unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("status: blocked"));
        assert!(content.contains("blocker_handoff: 045-unblock-auth"));
        assert!(content.contains("upstream schema not published"));
        assert!(content.contains("No commits recorded."));
    }
}
