//! Front-matter extraction and parsing

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::helpers::normalize_date;

/// Delimiter line that opens and closes the metadata block
const DELIMITER: &str = "---";

/// Fields normalized to `YYYY-MM-DD` before the typed record is built
const DATE_FIELDS: [&str; 2] = ["date", "updated"];

/// Errors raised while reading a metadata block
#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Malformed front-matter: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_string")]
    pub excerpt: String,
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,
    /// Publication date, `YYYY-MM-DD` when the source was date-like
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub updated: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub featured_image: String,
    /// Minutes, as declared by the author (0 when absent)
    #[serde(deserialize_with = "lenient_u32")]
    pub reading_time: u32,
    #[serde(deserialize_with = "lenient_bool")]
    pub draft: bool,
    #[serde(
        deserialize_with = "lenient_seo",
        skip_serializing_if = "Option::is_none"
    )]
    pub seo: Option<Seo>,
}

/// Optional SEO overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

impl Frontmatter {
    /// Split a raw document and parse its metadata block
    /// Returns (front_matter, remaining_content)
    ///
    /// A document without a block yields the default record and the whole
    /// document as body.
    pub fn parse(raw: &str) -> Result<(Self, &str), FrontmatterError> {
        let (value, body) = extract_value(raw)?;
        let fm = match value {
            Value::Mapping(mapping) => {
                // Only string keys can name a field; `2024:` or `true:` are ignored
                let fields: Mapping = mapping
                    .into_iter()
                    .filter(|(key, _)| key.is_string())
                    .collect();
                serde_yaml::from_value(Value::Mapping(fields))?
            }
            _ => Frontmatter::default(),
        };
        Ok((fm, body))
    }
}

/// Split a raw document into (metadata text, body)
///
/// The opening delimiter must be the very first line; the closing delimiter
/// is the next line consisting of `---` alone.
pub fn split_block(raw: &str) -> Option<(&str, &str)> {
    let doc = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let rest = doc
        .strip_prefix("---\n")
        .or_else(|| doc.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.trim_end_matches('\n').trim_end_matches('\r');
        if content == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Parse the metadata block into a YAML value with dates normalized
///
/// Returns `Value::Null` when the document has no block.
pub fn extract_value(raw: &str) -> Result<(Value, &str), FrontmatterError> {
    let Some((yaml, body)) = split_block(raw) else {
        return Ok((Value::Null, raw));
    };

    if yaml.trim().is_empty() {
        return Ok((Value::Null, body));
    }

    let mut value: Value = serde_yaml::from_str(yaml)?;
    if let Value::Mapping(mapping) = &mut value {
        normalize_dates(mapping);
    }

    Ok((value, body))
}

/// Rewrite date-like `date`/`updated` values to the canonical form
fn normalize_dates(mapping: &mut Mapping) {
    for key in DATE_FIELDS {
        let Some(value) = mapping.get_mut(key) else {
            continue;
        };
        let raw = match value {
            Value::String(s) => s.as_str(),
            // `!!timestamp 2024-01-15` and friends
            Value::Tagged(tagged) => match &tagged.value {
                Value::String(s) => s.as_str(),
                _ => continue,
            },
            _ => continue,
        };
        if let Some(normalized) = normalize_date(raw) {
            *value = Value::String(normalized);
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        _ => None,
    }
}

/// Accept any scalar, falling back to the empty string
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_string(&value).unwrap_or_default())
}

/// Handle both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_string).collect(),
        Value::Null => Vec::new(),
        other => scalar_string(&other).into_iter().collect(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.ceil() as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(n.and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_seo<'de, D>(deserializer: D) -> Result<Option<Seo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Mapping(mapping) = value else {
        return Ok(None);
    };
    Ok(Some(Seo {
        og_image: mapping.get("ogImage").and_then(scalar_string),
        canonical_url: mapping.get("canonicalUrl").and_then(scalar_string),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
slug: hello-world
excerpt: A first post
author: Ranjith
date: 2024-01-15
updated: 2024-02-01
category: programming
tags:
  - rust
  - blog
featuredImage: ./assets/cover.png
readingTime: 4
draft: false
seo:
  ogImage: ./assets/og.png
---

This is the content.
"#;

        let (fm, remaining) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.slug, "hello-world");
        assert_eq!(fm.date, "2024-01-15");
        assert_eq!(fm.updated, "2024-02-01");
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.featured_image, "./assets/cover.png");
        assert_eq!(fm.reading_time, 4);
        assert!(!fm.draft);
        let seo = fm.seo.unwrap();
        assert_eq!(seo.og_image.as_deref(), Some("./assets/og.png"));
        assert_eq!(seo.canonical_url, None);
        assert_eq!(remaining, "\nThis is the content.\n");
    }

    #[test]
    fn test_missing_block_is_whole_body() {
        let (fm, remaining) = Frontmatter::parse("just body text").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(remaining, "just body text");
    }

    #[test]
    fn test_block_must_open_the_document() {
        let content = "\n---\ntitle: Late\n---\nbody";
        let (fm, remaining) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm.title, "");
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let content = "---\ntitle: Never closed\n";
        let (fm, remaining) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\ntags: : :\n---\nbody";
        assert!(matches!(
            Frontmatter::parse(content),
            Err(FrontmatterError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_block() {
        let (fm, remaining) = Frontmatter::parse("---\n---\nbody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (fm, remaining) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm.title, "Windows");
        assert_eq!(remaining, "body\r\n");
    }

    #[test]
    fn test_closing_delimiter_at_end_of_document() {
        let (fm, remaining) = Frontmatter::parse("---\ntitle: Only meta\n---").unwrap();
        assert_eq!(fm.title, "Only meta");
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_horizontal_rule_in_body_is_kept() {
        let content = "---\ntitle: Rules\n---\nabove\n\n---\n\nbelow\n";
        let (fm, remaining) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm.title, "Rules");
        assert_eq!(remaining, "above\n\n---\n\nbelow\n");
    }

    #[test]
    fn test_date_forms_normalize_identically() {
        let forms = [
            "date: 2024-01-15",
            "date: \"2024-01-15\"",
            "date: 2024-01-15 10:30:00",
            "date: 2024-01-15T10:30:00Z",
        ];
        for form in forms {
            let content = format!("---\n{}\n---\n", form);
            let (fm, _) = Frontmatter::parse(&content).unwrap();
            assert_eq!(fm.date, "2024-01-15", "form: {}", form);
        }
    }

    #[test]
    fn test_non_date_value_passes_through() {
        let (fm, _) = Frontmatter::parse("---\ndate: someday\n---\n").unwrap();
        assert_eq!(fm.date, "someday");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: Single Tag Post\ntags: Notes\n---\n\nContent here.\n";
        let (fm, _) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_lenient_field_types() {
        let content = r#"---
title: 42
slug: Not A Valid Slug!
readingTime: "7"
draft: "true"
tags: [1, two, {nested: map}]
seo: just-a-string
---
"#;
        let (fm, _) = Frontmatter::parse(content).unwrap();
        assert_eq!(fm.title, "42");
        // Slug validation happens elsewhere; the raw value is kept
        assert_eq!(fm.slug, "Not A Valid Slug!");
        assert_eq!(fm.reading_time, 7);
        assert!(fm.draft);
        assert_eq!(fm.tags, vec!["1", "two"]);
        assert_eq!(fm.seo, None);
    }

    #[test]
    fn test_non_string_keys_are_ignored() {
        let (fm, body) = Frontmatter::parse("---\n2024: archive\ntitle: T\n---\n").unwrap();
        assert_eq!(fm.title, "T");
        assert_eq!(body, "");

        for key in ["true", "0", "1.5", "~"] {
            let raw = format!("---\n{}: x\ntitle: T\n---\nbody", key);
            let (fm, body) = Frontmatter::parse(&raw).unwrap();
            assert_eq!(fm.title, "T");
            assert_eq!(body, "body");
        }
    }

    #[test]
    fn test_non_mapping_block_is_default() {
        let (fm, remaining) = Frontmatter::parse("---\n- a\n- b\n---\nbody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_extract_value_keeps_unknown_keys() {
        let (value, body) = extract_value("---\ncustom: yes\ndate: 2024-03-01T00:00:00Z\n---\nx").unwrap();
        assert_eq!(body, "x");
        assert_eq!(value.get("custom").and_then(Value::as_str), Some("yes"));
        assert_eq!(value.get("date").and_then(Value::as_str), Some("2024-03-01"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let fm = Frontmatter {
            featured_image: "cover.png".to_string(),
            reading_time: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&fm).unwrap();
        assert_eq!(json["featuredImage"], "cover.png");
        assert_eq!(json["readingTime"], 3);
        assert!(json.get("seo").is_none());
    }
}
