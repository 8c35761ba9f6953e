//! Helper functions shared by the pipeline and the client
//!
//! Escaping, URL building and date handling live here so the renderer,
//! the frontmatter extractor and the CLI agree on one implementation.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
