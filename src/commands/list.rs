//! List blog content

use anyhow::Result;
use std::fmt::Write;

use crate::content::BlogIndex;
use crate::Blog;

/// List blog content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<String> {
    let mut client = blog.client();
    let index = client.index()?;

    let site = &client.config().blog;
    let mut out = String::new();
    writeln!(out, "{}", site.title)?;
    if !site.description.is_empty() {
        writeln!(out, "{}", site.description)?;
    }
    writeln!(out)?;
    out.push_str(&format_listing(&index, content_type)?);
    Ok(out)
}

/// Format the index for one content type
pub fn format_listing(index: &BlogIndex, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            writeln!(out, "Posts ({}):", index.posts.len())?;
            for post in &index.posts {
                writeln!(
                    out,
                    "  {} - {} [{}/{}]",
                    post.date, post.title, post.folder, post.post_id
                )?;
            }
        }
        "tag" | "tags" => {
            writeln!(out, "Tags ({}):", index.tags.len())?;
            for (tag, count) in sorted_counts(&index.tags) {
                writeln!(out, "  {} ({})", tag, count)?;
            }
        }
        "category" | "categories" => {
            writeln!(out, "Categories ({}):", index.categories.len())?;
            for (category, count) in sorted_counts(&index.categories) {
                writeln!(out, "  {} ({})", category, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(out)
}

/// Most used first; ties keep index order
fn sorted_counts(counts: &indexmap::IndexMap<String, usize>) -> Vec<(&String, &usize)> {
    let mut counts: Vec<_> = counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1));
    counts
}
