//! YAML frontmatter for static markdown content files.

use pulldown_cmark::{html, Options, Parser};
use serde_json::{Map, Value};
use tracing::warn;

use super::record::ContentRecord;

/// A markdown document split into its frontmatter fields and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
    pub fields: Map<String, Value>,
    pub body: &'a str,
}

/// Split `---\n<yaml>\n---\n<body>`.
///
/// Content without an opening delimiter, without a closing delimiter, or with
/// unparseable YAML yields no fields; the body is everything after the
/// closing delimiter when one exists.
pub fn extract_frontmatter(content: &str) -> Frontmatter<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if !content.starts_with("---") {
        return Frontmatter {
            fields: Map::new(),
            body: content,
        };
    }

    let after_open = match content[3..].find('\n') {
        Some(pos) => &content[3 + pos + 1..],
        None => {
            return Frontmatter {
                fields: Map::new(),
                body: content,
            }
        }
    };

    let (yaml, rest) = if let Some(rest) = after_open.strip_prefix("---") {
        ("", rest)
    } else if let Some(close) = after_open.find("\n---") {
        (&after_open[..close], &after_open[close + 4..])
    } else {
        warn!("Frontmatter opening delimiter found but no closing delimiter");
        return Frontmatter {
            fields: Map::new(),
            body: content,
        };
    };

    let body = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')).unwrap_or(rest);

    Frontmatter {
        fields: parse_yaml_fields(yaml),
        body,
    }
}

fn parse_yaml_fields(yaml: &str) -> Map<String, Value> {
    if yaml.trim().is_empty() {
        return Map::new();
    }

    let parsed = serde_yaml::from_str::<serde_yaml::Value>(yaml)
        .map_err(|e| e.to_string())
        .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string()));

    match parsed {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("Frontmatter is not a mapping; ignoring it");
            Map::new()
        }
        Err(e) => {
            warn!("Failed to parse frontmatter YAML: {}", e);
            Map::new()
        }
    }
}

pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Build a content record from a markdown file: frontmatter fields, plus
/// `body` (raw markdown) and `body_html`, plus `id` = `slug` when the
/// frontmatter names no id.
pub fn markdown_record(slug: &str, content: &str) -> ContentRecord {
    let doc = extract_frontmatter(content);
    let mut record = ContentRecord::from(doc.fields);

    if !record.contains("id") {
        record.insert("id", slug);
    }

    let body = doc.body.trim();
    if !body.is_empty() {
        record.insert("body", body);
        record.insert("body_html", render_markdown(body));
    }

    record
}
