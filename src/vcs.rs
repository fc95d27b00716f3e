//! Version-control queries for closure reports.
//!
//! Thin shell-outs to `git`, bounded by the plan's creation timestamp.
//! These are best-effort: the closure engine calls the degrading
//! wrapper, which turns any failure into empty statistics with a
//! warning instead of aborting the close or block.

use crate::error::VcsError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub subject: String,
}

/// Commits and touched files gathered for a report.
#[derive(Debug, Clone, Default)]
pub struct ChangeSummary {
    pub commits: Vec<CommitInfo>,
    pub files: Vec<PathBuf>,
}

/// Commits since the given timestamp, newest first.
pub fn commits_since(repo_dir: &Path, since: DateTime<Utc>) -> Result<Vec<CommitInfo>, VcsError> {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args([
            "log",
            &format!("--since={}", since.to_rfc3339()),
            "--pretty=format:%h %s",
        ])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VcsError::Git(stderr.to_string()));
    }

    Ok(parse_log_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Files touched by any commit since the given timestamp.
pub fn changed_files_since(
    repo_dir: &Path,
    since: DateTime<Utc>,
) -> Result<Vec<PathBuf>, VcsError> {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args([
            "log",
            &format!("--since={}", since.to_rfc3339()),
            "--name-only",
            "--pretty=format:",
        ])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VcsError::Git(stderr.to_string()));
    }

    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
}

/// Best-effort change summary; degrades to empty results on failure.
pub fn gather_change_summary(repo_dir: &Path, since: DateTime<Utc>) -> ChangeSummary {
    let commits = match commits_since(repo_dir, since) {
        Ok(commits) => commits,
        Err(e) => {
            warn!("Could not gather commit history: {}", e);
            Vec::new()
        }
    };

    let files = match changed_files_since(repo_dir, since) {
        Ok(files) => files,
        Err(e) => {
            warn!("Could not gather changed files: {}", e);
            Vec::new()
        }
    };

    ChangeSummary { commits, files }
}

fn parse_log_output(raw: &str) -> Vec<CommitInfo> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(' ') {
            Some((hash, subject)) => CommitInfo {
                hash: hash.to_string(),
                subject: subject.to_string(),
            },
            None => CommitInfo {
                hash: line.to_string(),
                subject: String::new(),
            },
        })
        .collect()
}

fn parse_name_only(raw: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let path = PathBuf::from(line);
        if !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_output() {
        let raw = "abc1234 Fix token refresh\ndef5678 Add rate limit headers\n";
        let commits = parse_log_output(raw);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "abc1234");
        assert_eq!(commits[0].subject, "Fix token refresh");
    }

    #[test]
    fn test_parse_log_output_empty() {
        assert!(parse_log_output("").is_empty());
        assert!(parse_log_output("\n\n").is_empty());
    }

    #[test]
    fn test_parse_name_only_dedupes() {
        let raw = "src/api.rs\nsrc/lib.rs\n\nsrc/api.rs\n";
        let files = parse_name_only(raw);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], PathBuf::from("src/api.rs"));
    }

    #[test]
    fn test_gather_degrades_to_empty_outside_a_repo() {
        let dir = tempfile::tempdir().unwrap();
        let summary = gather_change_summary(dir.path(), Utc::now());
        assert!(summary.commits.is_empty());
        assert!(summary.files.is_empty());
    }
}
