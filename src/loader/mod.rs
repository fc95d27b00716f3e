//! Handoff document discovery and parsing.
//!
//! Walks the handoff directory (honoring ignore rules), filters with
//! the configured include globs, and parses each file. A file whose
//! frontmatter cannot be parsed is reported as a `ValidationError`
//! value and skipped; it never aborts the load of the rest of the
//! corpus.

pub mod frontmatter;

use crate::error::LoaderError;
use crate::handoff::{HandoffDocument, HandoffFrontmatter};
use crate::validator::{codes, ValidationError};
use frontmatter::{parse_frontmatter, serialize_frontmatter};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Outcome of a corpus load: parsed documents plus per-file parse
/// problems, both always populated as far as possible.
#[derive(Debug, Default)]
pub struct LoadResult {
    pub documents: Vec<HandoffDocument>,
    pub errors: Vec<ValidationError>,
}

/// Load every handoff document under `handoff_dir`.
pub fn load_documents(handoff_dir: &Path, include: &[String]) -> Result<LoadResult, LoaderError> {
    let include_set = build_globset(include)?;
    let mut result = LoadResult::default();

    if !handoff_dir.exists() {
        debug!("Handoff directory {} does not exist", handoff_dir.display());
        return Ok(result);
    }

    let walker = WalkBuilder::new(handoff_dir)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let rel_path = path.strip_prefix(handoff_dir).unwrap_or(path);
        if !include.is_empty() && !include_set.is_match(rel_path) {
            continue;
        }

        paths.push(path.to_path_buf());
    }
    paths.sort();

    for path in paths {
        match parse_document(&path) {
            Ok(doc) => result.documents.push(doc),
            Err(message) => result.errors.push(ValidationError::new(
                &path,
                None,
                message,
                codes::PARSE_ERROR,
            )),
        }
    }

    Ok(result)
}

/// Parse a single handoff document file.
pub fn parse_document(path: &Path) -> Result<HandoffDocument, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("failed to read file: {}", e))?;

    let (fm_value, body) = parse_frontmatter(&content).map_err(|e| e.to_string())?;
    let frontmatter: HandoffFrontmatter =
        serde_yaml::from_value(fm_value).map_err(|e| format!("invalid frontmatter: {}", e))?;

    Ok(HandoffDocument {
        frontmatter,
        body,
        file_path: path.to_path_buf(),
    })
}

/// Look up a loaded document by handoff id.
pub fn find_by_id<'a>(docs: &'a [HandoffDocument], id: &str) -> Option<&'a HandoffDocument> {
    docs.iter().find(|doc| doc.id() == id)
}

/// Rewrite selected frontmatter keys of a handoff file in place.
/// Goes through `serde_yaml::Value` so keys this tool does not model
/// are preserved, and leaves the body untouched.
pub fn rewrite_frontmatter_fields(
    path: &Path,
    updates: &[(&str, serde_yaml::Value)],
) -> Result<(), LoaderError> {
    let content = fs::read_to_string(path)?;
    let (mut fm_value, body) =
        parse_frontmatter(&content).map_err(|source| LoaderError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;

    if let serde_yaml::Value::Mapping(ref mut map) = fm_value {
        for (key, value) in updates {
            map.insert(serde_yaml::Value::String(key.to_string()), value.clone());
        }
    }

    let rewritten =
        serialize_frontmatter(&fm_value, &body).map_err(|source| LoaderError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, rewritten)?;
    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, LoaderError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| LoaderError::GlobPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| LoaderError::GlobPattern {
        pattern: "include set".to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_handoff(dir: &Path, name: &str, id: &str) {
        let content = format!(
            "---\nhandoff_id: {}\ndirection: incoming\nfrom_repo: upstream\nto_repo: local-repo\ncreated_at: \"2026-03-01T12:00:00Z\"\nstatus: new\n---\n\nBody of {}.\n",
            id, id
        );
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_documents_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_handoff(dir.path(), "031-auth.md", "031-auth");
        write_handoff(dir.path(), "032-limits.md", "032-limits");

        let result = load_documents(dir.path(), &["**/*.md".to_string()]).unwrap();
        assert_eq!(result.documents.len(), 2);
        assert!(result.errors.is_empty());
        assert!(find_by_id(&result.documents, "031-auth").is_some());
    }

    #[test]
    fn test_unparseable_file_becomes_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        write_handoff(dir.path(), "031-auth.md", "031-auth");
        fs::write(dir.path().join("broken.md"), "no frontmatter here\n").unwrap();

        let result = load_documents(dir.path(), &["**/*.md".to_string()]).unwrap();
        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, codes::PARSE_ERROR);
    }

    #[test]
    fn test_missing_directory_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            load_documents(&dir.path().join("nope"), &["**/*.md".to_string()]).unwrap();
        assert!(result.documents.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_include_filter() {
        let dir = tempfile::tempdir().unwrap();
        write_handoff(dir.path(), "031-auth.md", "031-auth");
        fs::write(dir.path().join("notes.txt"), "not a handoff").unwrap();

        let result = load_documents(dir.path(), &["**/*.md".to_string()]).unwrap();
        assert_eq!(result.documents.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_rewrite_preserves_unknown_keys_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("031-auth.md");
        fs::write(
            &path,
            "---\nhandoff_id: 031-auth\nstatus: in_progress\nowner: alice\n---\n\nBody stays.\n",
        )
        .unwrap();

        rewrite_frontmatter_fields(
            &path,
            &[
                ("status", serde_yaml::Value::String("done".to_string())),
                (
                    "blocker_reason",
                    serde_yaml::Value::String("n/a".to_string()),
                ),
            ],
        )
        .unwrap();

        let doc = parse_document(&path).unwrap();
        assert_eq!(doc.frontmatter.status, "done");
        assert!(doc.body.contains("Body stays."));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("owner: alice"));
    }
}
