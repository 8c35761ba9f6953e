//! Parsed post model and the parsing pipeline

use serde::{Deserialize, Serialize};

use super::frontmatter::{Frontmatter, FrontmatterError};
use super::markdown::{Heading, MarkdownRenderer, RenderOptions};
use super::sanitize::{SanitizeError, Sanitizer};
use crate::helpers::word_count;

/// Average reading speed used when a post declares no reading time
const WORDS_PER_MINUTE: usize = 200;

/// A fully processed post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPost {
    /// Typed front-matter
    pub frontmatter: Frontmatter,

    /// Raw markdown body, without the metadata block
    pub content: String,

    /// Sanitized HTML, safe to display
    pub html: String,

    /// Outline in document order
    pub headings: Vec<Heading>,
}

impl ParsedPost {
    /// Reading time in minutes
    ///
    /// Uses the declared value when present, otherwise estimates it from the
    /// body at 200 words per minute (never less than one minute).
    pub fn reading_time(&self) -> u32 {
        if self.frontmatter.reading_time > 0 {
            return self.frontmatter.reading_time;
        }
        estimate_reading_time(&self.content)
    }
}

/// Estimate the reading time of a markdown body in minutes
pub fn estimate_reading_time(content: &str) -> u32 {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Extract, render and sanitize a raw post
///
/// Holds only immutable configuration, so one pipeline can parse any number
/// of posts.
#[derive(Debug, Default)]
pub struct PostPipeline {
    renderer: MarkdownRenderer,
    sanitizer: Sanitizer,
}

impl PostPipeline {
    /// Create a pipeline rendering with the given options
    pub fn new(options: RenderOptions) -> Self {
        Self {
            renderer: MarkdownRenderer::new(options),
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        self.renderer.options()
    }

    /// Parse a raw document fetched from `{folder}/{post_id}`
    ///
    /// Malformed front-matter is returned as an error. A sanitizer fault
    /// degrades to an empty body instead.
    pub fn parse(&self, raw: &str, folder: &str, post_id: &str) -> Result<ParsedPost, FrontmatterError> {
        self.parse_with(raw, folder, post_id, |html| self.sanitizer.sanitize(html))
    }

    fn parse_with<F>(&self, raw: &str, folder: &str, post_id: &str, clean: F) -> Result<ParsedPost, FrontmatterError>
    where
        F: FnOnce(&str) -> Result<String, SanitizeError>,
    {
        let (frontmatter, body) = Frontmatter::parse(raw)?;
        let rendered = self.renderer.render(body, folder, post_id);

        let html = match clean(&rendered.html) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Discarding HTML for {}/{}: {}", folder, post_id, e);
                String::new()
            }
        };

        Ok(ParsedPost {
            frontmatter,
            content: body.to_string(),
            html,
            headings: rendered.headings,
        })
    }
}

/// Parse a single post with an explicit renderer configuration
pub fn parse_post(
    raw: &str,
    folder: &str,
    post_id: &str,
    options: &RenderOptions,
) -> Result<ParsedPost, FrontmatterError> {
    PostPipeline::new(options.clone()).parse(raw, folder, post_id)
}
