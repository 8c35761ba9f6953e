//! HTML and URI escaping helpers

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escape the four characters that can break out of text or a quoted attribute
///
/// # Examples
/// ```ignore
/// escape_html(r#"<a href="x">"#) // -> "&lt;a href=&quot;x&quot;&gt;"
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a string the way `encodeURIComponent` does
///
/// The result contains no quotes or angle brackets, so it can be embedded
/// in an attribute value as-is.
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Count whitespace separated words
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
