//! Post validation
//!
//! The pipeline passes metadata through as-is; this is where the authoring
//! rules (required fields, slug shape, excerpt length) are enforced.

use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::extract_value;
use crate::helpers::normalize_date;

/// Fields every post must declare
pub const REQUIRED_FIELDS: [&str; 7] = [
    "title", "slug", "excerpt", "author", "date", "category", "tags",
];

/// Longest excerpt accepted, in characters
pub const MAX_EXCERPT_LENGTH: usize = 200;

lazy_static! {
    static ref SLUG_PATTERN: Regex = Regex::new(r"^[a-z0-9-]+$").expect("slug pattern is valid");
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validation result for one post file
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Path relative to the validated root
    pub path: PathBuf,
    pub issues: Vec<ValidationIssue>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => true,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => as_text(&tagged.value),
        _ => None,
    }
}

/// Look up a field, treating empty and falsy values as absent
fn present<'a>(metadata: &'a Value, name: &str) -> Option<&'a Value> {
    metadata.get(name).filter(|v| is_truthy(v))
}

/// Check a metadata mapping against the authoring rules
pub fn validate(metadata: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let field = |name: &'static str| present(metadata, name);

    for name in REQUIRED_FIELDS {
        if field(name).is_none() {
            issues.push(ValidationIssue::new(
                name,
                format!("Missing required field: {}", name),
            ));
        }
    }

    if let Some(slug) = field("slug").and_then(as_text) {
        if !SLUG_PATTERN.is_match(&slug) {
            issues.push(ValidationIssue::new(
                "slug",
                format!("Slug must be lowercase alphanumeric with hyphens: \"{}\"", slug),
            ));
        }
    }

    if let Some(excerpt) = field("excerpt").and_then(as_text) {
        let length = excerpt.chars().count();
        if length > MAX_EXCERPT_LENGTH {
            issues.push(ValidationIssue::new(
                "excerpt",
                format!(
                    "Excerpt too long ({} chars, max {})",
                    length, MAX_EXCERPT_LENGTH
                ),
            ));
        }
    }

    if let Some(tags) = field("tags") {
        if !tags.is_sequence() {
            issues.push(ValidationIssue::new("tags", "Tags must be an array"));
        }
    }

    if let Some(date) = field("date") {
        let valid = as_text(date).and_then(|d| normalize_date(&d)).is_some();
        if !valid {
            let shown = as_text(date).unwrap_or_else(|| format!("{:?}", date));
            issues.push(ValidationIssue::new(
                "date",
                format!("Invalid date format: \"{}\"", shown),
            ));
        }
    }

    issues
}

/// Validate a raw post document
pub fn validate_document(raw: &str) -> Vec<ValidationIssue> {
    match extract_value(raw) {
        Ok((value, _)) => validate(&value),
        Err(e) => vec![ValidationIssue::new("frontmatter", e.to_string())],
    }
}

/// Validate every `blogs*/post*/post.md` under `root`
///
/// Reports are returned for each post directory in path order, including
/// directories that are missing their `post.md`.
pub fn validate_dir(root: &Path) -> Vec<FileReport> {
    let mut reports = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let dir = entry.path();
        if !entry.file_type().is_dir() || !is_post_dir(dir) {
            continue;
        }

        let post_path = dir.join("post.md");
        let relative = post_path
            .strip_prefix(root)
            .unwrap_or(&post_path)
            .to_path_buf();

        let issues = if post_path.is_file() {
            match fs::read_to_string(&post_path) {
                Ok(raw) => validate_document(&raw),
                Err(e) => vec![ValidationIssue::new("file", format!("Could not read post.md: {}", e))],
            }
        } else {
            vec![ValidationIssue::new("file", "post.md file not found")]
        };

        if !issues.is_empty() {
            tracing::debug!("{} issue(s) in {:?}", issues.len(), relative);
        }
        reports.push(FileReport {
            path: relative,
            issues,
        });
    }

    reports
}

fn is_post_dir(dir: &Path) -> bool {
    fn name_starts_with(path: Option<&Path>, prefix: &str) -> bool {
        path.and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix))
    }
    name_starts_with(Some(dir), "post") && name_starts_with(dir.parent(), "blogs")
}
