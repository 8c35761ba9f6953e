//! Content module - front-matter, markdown rendering, sanitizing and the
//! post pipeline that ties them together

pub mod frontmatter;
pub mod index;
mod markdown;
mod post;
mod sanitize;
pub mod validate;

pub use frontmatter::{Frontmatter, FrontmatterError, Seo};
pub use index::{BlogIndex, BlogMetadata, PostSummary};
pub use markdown::{slugify, AssetLocation, Heading, MarkdownRenderer, RenderOptions, RenderedMarkdown};
pub use post::{estimate_reading_time, parse_post, ParsedPost, PostPipeline};
pub use sanitize::{SanitizeError, Sanitizer};
