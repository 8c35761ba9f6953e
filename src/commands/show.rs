//! Show a post through the cache-gated client

use anyhow::Result;
use std::fmt::Write;

use crate::client::ClientError;
use crate::content::ParsedPost;
use crate::helpers::full_date;
use crate::Blog;

/// Load `{folder}/{post_id}` and return its printable form
pub fn run(blog: &Blog, folder: &str, post_id: &str) -> Result<String> {
    let mut client = blog.client();

    let post = match client.load_post(folder, post_id) {
        Ok(post) => post,
        Err(ClientError::Frontmatter(e)) => {
            tracing::warn!("Skipping {}/{}: {}", folder, post_id, e);
            anyhow::bail!("could not load this post: {}", e);
        }
        Err(e) => return Err(e.into()),
    };

    render(&post)
}

fn render(post: &ParsedPost) -> Result<String> {
    let meta = &post.frontmatter;
    let mut out = String::new();

    let title = if meta.title.is_empty() { "(untitled)" } else { meta.title.as_str() };
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.chars().count()))?;

    if !meta.author.is_empty() {
        writeln!(out, "Author:   {}", meta.author)?;
    }
    if !meta.date.is_empty() {
        writeln!(out, "Date:     {}", full_date(&meta.date))?;
    }
    if !meta.updated.is_empty() {
        writeln!(out, "Updated:  {}", full_date(&meta.updated))?;
    }
    if !meta.category.is_empty() {
        writeln!(out, "Category: {}", meta.category)?;
    }
    if !meta.tags.is_empty() {
        writeln!(out, "Tags:     {}", meta.tags.join(", "))?;
    }
    writeln!(out, "Reading:  {} min", post.reading_time())?;

    if !post.headings.is_empty() {
        writeln!(out, "\nContents:")?;
        for heading in &post.headings {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            writeln!(out, "{}- {} (#{})", indent, heading.text, heading.id)?;
        }
    }

    writeln!(out, "\n{}", post.html)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn blog_with(post: &str) -> (TempDir, Blog) {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        let dir = blog.data_dir.join("blogs-2024").join("post-01");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("post.md"), post).unwrap();
        (tmp, blog)
    }

    #[test]
    fn test_show_post() {
        let (_tmp, blog) = blog_with("---\ntitle: Shown\ndate: 2024-01-15\ntags: [a, b]\n---\n## Part\ntext\n");
        let out = run(&blog, "blogs-2024", "post-01").unwrap();
        assert!(out.starts_with("Shown\n=====\n"));
        assert!(out.contains("Date:     January 15, 2024"));
        assert!(out.contains("Tags:     a, b"));
        assert!(out.contains("  - Part (#part)"));
        assert!(out.contains(r#"<h2 id="part">"#));
    }

    #[test]
    fn test_show_malformed_post() {
        let (_tmp, blog) = blog_with("---\ntitle: [oops\n---\nbody\n");
        let err = run(&blog, "blogs-2024", "post-01").unwrap_err();
        assert!(err.to_string().starts_with("could not load this post: "));
    }

    #[test]
    fn test_show_missing_post() {
        let (_tmp, blog) = blog_with("body");
        assert!(run(&blog, "blogs-2024", "post-09").is_err());
    }
}
