//! Parse a single post file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::ParsedPost;
use crate::Blog;

/// Parse `file` and return the JSON to print
///
/// With `headings_only` only the outline is emitted.
pub fn run(blog: &Blog, file: &Path, folder: &str, post_id: &str, headings_only: bool) -> Result<String> {
    let raw = fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let post = blog
        .parse(&raw, folder, post_id)
        .with_context(|| format!("Failed to parse {:?}", file))?;

    tracing::info!(
        "Parsed {:?}: {} heading(s), {} min read",
        file,
        post.headings.len(),
        post.reading_time()
    );

    render_json(&post, headings_only)
}

fn render_json(post: &ParsedPost, headings_only: bool) -> Result<String> {
    let json = if headings_only {
        serde_json::to_string_pretty(&post.headings)?
    } else {
        serde_json::to_string_pretty(post)?
    };
    Ok(json)
}

/// Guess `(folder, post_id)` from a `{folder}/{post_id}/post.md` path
pub fn infer_location(file: &Path) -> (String, String) {
    let name = |p: Option<&Path>| {
        p.and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string()
    };
    let post_dir = file.parent();
    let folder_dir = post_dir.and_then(Path::parent);
    (name(folder_dir), name(post_dir))
}
