//! YAML frontmatter handling for handoff, plan, and report documents.
//!
//! Documents are markdown files with a `---`-delimited YAML header. The
//! split is done on raw lines so the body is returned byte-for-byte
//! (minus the header), which keeps content hashing stable across
//! rewrite operations that only touch the header.

use crate::error::FrontmatterError;

/// Split a document into its parsed YAML header and markdown body.
pub fn parse_frontmatter(content: &str) -> Result<(serde_yaml::Value, String), FrontmatterError> {
    let lines: Vec<&str> = content.lines().collect();

    if !lines.first().is_some_and(|line| line.trim() == "---") {
        return Err(FrontmatterError::MissingOpen);
    }

    let closing_index = lines[1..]
        .iter()
        .position(|line| line.trim() == "---")
        .ok_or(FrontmatterError::MissingClose)?
        + 1;

    let frontmatter_str = lines[1..closing_index].join("\n");
    let frontmatter: serde_yaml::Value = serde_yaml::from_str(&frontmatter_str)?;

    let content_start = closing_index + 1;
    let body = if content_start < lines.len() {
        lines[content_start..].join("\n")
    } else {
        String::new()
    };

    Ok((frontmatter, body.trim_start_matches('\n').to_string()))
}

/// Serialize a YAML header and markdown body back into document form.
pub fn serialize_frontmatter(
    frontmatter: &serde_yaml::Value,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body.trim_start_matches('\n')))
}
