//! Allow-list HTML sanitizing
//!
//! Wraps an `ammonia` builder configured for the renderer's output: the
//! default safe tag set plus the anchor, code-block and image attributes the
//! renderer emits.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// The sanitizer could not produce a document
#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("Sanitizer aborted: {0}")]
    Aborted(String),
}

/// HTML sanitizer for rendered post bodies
pub struct Sanitizer {
    builder: ammonia::Builder<'static>,
}

impl Sanitizer {
    /// Create a sanitizer with the blog allow-list
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        builder
            .add_tags(&["button", "input"])
            .add_tag_attributes("h1", &["id"])
            .add_tag_attributes("h2", &["id"])
            .add_tag_attributes("h3", &["id"])
            .add_tag_attributes("h4", &["id"])
            .add_tag_attributes("h5", &["id"])
            .add_tag_attributes("h6", &["id"])
            .add_tag_attributes("a", &["class", "target"])
            .add_tag_attributes("div", &["class"])
            .add_tag_attributes("span", &["class"])
            .add_tag_attributes("pre", &["class"])
            .add_tag_attributes("code", &["class"])
            .add_tag_attributes("button", &["class", "data-code"])
            .add_tag_attributes("img", &["title", "loading"])
            .add_tag_attributes("input", &["type", "checked", "disabled"]);
        Self { builder }
    }

    /// Remove every element and attribute outside the allow-list
    ///
    /// Never returns the input unsanitized: any internal fault is reported
    /// as an error instead.
    pub fn sanitize(&self, html: &str) -> Result<String, SanitizeError> {
        guarded(|| self.builder.clean(html).to_string())
    }
}

/// Run a cleaning pass, turning a panic into [`SanitizeError::Aborted`]
pub(crate) fn guarded<F>(clean: F) -> Result<String, SanitizeError>
where
    F: FnOnce() -> String,
{
    panic::catch_unwind(AssertUnwindSafe(clean)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        SanitizeError::Aborted(message)
    })
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer").finish_non_exhaustive()
    }
}
