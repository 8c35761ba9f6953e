//! Markdown rendering with heading anchors, asset rewriting and code blocks
//!
//! The renderer walks the pulldown-cmark event stream once. Headings, images
//! and code blocks are captured as the parser reports them and replaced with
//! custom HTML, so the outline is collected from real token boundaries rather
//! than from the generated markup.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use crate::config::BlogConfig;
use crate::helpers::{encode_uri_component, escape_html, resolve_image_src};

/// Language label used when a code block declares none
const FALLBACK_LANGUAGE: &str = "text";

/// Content host coordinates used to resolve `./assets/` references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLocation {
    pub base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for AssetLocation {
    fn default() -> Self {
        BlogConfig::default().asset_location()
    }
}

/// Immutable renderer configuration, passed in for every render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub assets: AssetLocation,
    /// Tables, strikethrough and task lists
    pub gfm: bool,
    /// Render soft line breaks as `<br />`
    pub breaks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        BlogConfig::default().render_options()
    }
}

/// An entry in a post's outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Output of a single render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Markdown renderer with the blog's custom rules
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

struct HeadingCapture<'a> {
    level: HeadingLevel,
    inner: Vec<Event<'a>>,
    text: String,
}

struct ImageCapture<'a> {
    src: CowStr<'a>,
    title: CowStr<'a>,
    alt: String,
    depth: usize,
}

struct CodeCapture {
    lang: Option<String>,
    code: String,
}

impl MarkdownRenderer {
    /// Create a renderer with the given options
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn parser_options(&self) -> Options {
        if self.options.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Render markdown to HTML, collecting headings in document order
    ///
    /// `folder` and `post_id` locate the post on the content host and are only
    /// used to resolve `./assets/` image references.
    pub fn render(&self, markdown: &str, folder: &str, post_id: &str) -> RenderedMarkdown {
        let parser = Parser::new_ext(markdown, self.parser_options());

        let mut events: Vec<Event> = Vec::new();
        let mut headings: Vec<Heading> = Vec::new();
        let mut heading: Option<HeadingCapture> = None;
        let mut image: Option<ImageCapture> = None;
        let mut code: Option<CodeCapture> = None;

        for event in parser {
            if let Some(block) = code.as_mut() {
                match event {
                    Event::Text(text) => block.code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(block) = code.take() {
                            let rendered = render_code_block(block.lang.as_deref(), &block.code);
                            events.push(Event::Html(rendered.into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if let Some(img) = image.as_mut() {
                match event {
                    Event::Text(text) | Event::Code(text) => img.alt.push_str(&text),
                    Event::SoftBreak | Event::HardBreak => img.alt.push(' '),
                    Event::Start(Tag::Image { .. }) => img.depth += 1,
                    Event::End(TagEnd::Image) if img.depth > 0 => img.depth -= 1,
                    Event::End(TagEnd::Image) => {
                        if let Some(img) = image.take() {
                            let src = resolve_image_src(&self.options.assets, folder, post_id, &img.src);
                            let rendered = render_image(&src, &img.alt, &img.title);
                            emit(&mut events, &mut heading, Event::InlineHtml(rendered.into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some(CodeCapture {
                        lang: code_language(&kind),
                        code: String::new(),
                    });
                }
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(ImageCapture {
                        src: dest_url,
                        title,
                        alt: String::new(),
                        depth: 0,
                    });
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some(HeadingCapture {
                        level,
                        inner: Vec::new(),
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(capture) = heading.take() {
                        let (entry, rendered) = finish_heading(capture);
                        headings.push(entry);
                        events.push(Event::Html(rendered.into()));
                    }
                }
                Event::SoftBreak if self.options.breaks => {
                    emit(&mut events, &mut heading, Event::HardBreak);
                }
                other => emit(&mut events, &mut heading, other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            headings,
        }
    }
}

/// Route an event into the open heading, or into the document
fn emit<'a>(events: &mut Vec<Event<'a>>, heading: &mut Option<HeadingCapture<'a>>, event: Event<'a>) {
    match heading {
        Some(capture) => {
            match &event {
                Event::Text(text) | Event::Code(text) => capture.text.push_str(text),
                Event::SoftBreak | Event::HardBreak => capture.text.push(' '),
                _ => {}
            }
            capture.inner.push(event);
        }
        None => events.push(event),
    }
}

fn finish_heading(capture: HeadingCapture) -> (Heading, String) {
    let level = capture.level as u8;
    let text = capture.text.trim().to_string();
    let id = slugify(&text);

    let mut inner = String::new();
    html::push_html(&mut inner, capture.inner.into_iter());

    let rendered = format!(
        "<h{level} id=\"{id}\"><a href=\"#{id}\" class=\"anchor-link\">{inner}</a></h{level}>\n",
        level = level,
        id = id,
        inner = inner.trim_end()
    );

    (Heading { id, text, level }, rendered)
}

fn code_language(kind: &CodeBlockKind) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

fn render_code_block(lang: Option<&str>, code: &str) -> String {
    let lang = escape_html(lang.unwrap_or(FALLBACK_LANGUAGE));
    let code = code.strip_suffix('\n').unwrap_or(code);

    format!(
        concat!(
            r#"<div class="code-block-wrapper"><div class="code-header">"#,
            r#"<span class="code-lang">{lang}</span>"#,
            r#"<button class="copy-btn" data-code="{data}">Copy</button></div>"#,
            r#"<pre><code class="language-{lang}">{escaped}</code></pre></div>"#,
            "\n"
        ),
        lang = lang,
        data = encode_uri_component(code),
        escaped = escape_html(code)
    )
}

fn render_image(src: &str, alt: &str, title: &str) -> String {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy" />"#,
        escape_html(src),
        escape_html(alt),
        title_attr
    )
}

/// Derive a heading anchor from its text
///
/// Lowercases, drops everything but ASCII word characters, whitespace and
/// `-`, then turns each whitespace run into a single `-`.
///
/// # Examples
/// ```ignore
/// slugify("Hello, World!") // -> "hello-world"
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
            in_space = false;
        }
    }

    slug
}
