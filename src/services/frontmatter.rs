//! Splitting a post into its `---` metadata block and markdown body.
//!
//! Only the span from the first non-blank line up to the next `---` line is considered
//! metadata. The scan gives up at a markdown heading or after [`MAX_FRONTMATTER_LINES`],
//! so separators inside the body are never mistaken for the closing delimiter.

use serde_yaml::{Mapping, Value};

use crate::errors::FrontmatterError;

pub const DELIMITER: &str = "---";
pub const MAX_FRONTMATTER_LINES: usize = 60;

const BOM: char = '\u{feff}';

/// Raw pieces of a document whose delimiters are well formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument<'a> {
    /// Lines between the delimiters, joined with `\n`
    pub block: String,
    /// Everything after the closing delimiter line, verbatim
    pub body: &'a str,
}

/// A document with its metadata parsed into a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument<'a> {
    pub metadata: Mapping,
    pub body: &'a str,
}

/// Typed view of the recognized metadata fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
}

impl Frontmatter {
    pub fn from_mapping(metadata: &Mapping) -> Self {
        Self {
            title: metadata.get("title").and_then(scalar_text),
            date: metadata.get("date").and_then(scalar_text),
            summary: metadata.get("summary").and_then(scalar_text),
            tags: normalize_tags(metadata.get("tags")),
        }
    }
}

/// Line of the source with the byte offset just past its terminator
struct Line<'a> {
    text: &'a str,
    end: usize,
}

fn lines_with_offsets(raw: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    raw.split_inclusive('\n').map(move |chunk| {
        offset += chunk.len();
        let text = chunk.strip_suffix('\n').unwrap_or(chunk);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Line { text, end: offset }
    })
}

/// `#` through `######` followed by whitespace
fn is_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=6).contains(&hashes)
        && line[hashes..].chars().next().is_some_and(char::is_whitespace)
}

/// Locate the metadata block without interpreting it
pub fn split(raw: &str) -> Result<RawDocument<'_>, FrontmatterError> {
    let raw = raw.strip_prefix(BOM).unwrap_or(raw);
    let mut lines = lines_with_offsets(raw).skip_while(|line| line.text.trim().is_empty());

    let opening = lines.next().ok_or(FrontmatterError::Empty)?;
    if opening.text.trim() != DELIMITER {
        return Err(FrontmatterError::MissingOpening);
    }

    let mut block = Vec::new();
    for (distance, line) in lines.enumerate() {
        if is_heading(line.text) || distance >= MAX_FRONTMATTER_LINES {
            break;
        }
        if line.text.trim() == DELIMITER {
            return Ok(RawDocument {
                block: block.join("\n"),
                body: &raw[line.end..],
            });
        }
        block.push(line.text);
    }
    Err(FrontmatterError::Unclosed)
}

/// Split a document and parse its metadata block as a YAML mapping
pub fn parse(raw: &str) -> Result<ParsedDocument<'_>, FrontmatterError> {
    let RawDocument { block, body } = split(raw)?;
    let metadata = parse_block(&block)?;
    Ok(ParsedDocument { metadata, body })
}

fn parse_block(block: &str) -> Result<Mapping, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value =
        serde_yaml::from_str(block).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter(|(key, _)| key.is_string())
            .collect()),
        _ => Err(FrontmatterError::Yaml("frontmatter must be a mapping".to_string())),
    }
}

/// Coerce a `tags` value into a list of strings
pub fn normalize_tags(tags: Option<&Value>) -> Vec<String> {
    match tags {
        Some(Value::String(tag)) => vec![tag.clone()],
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_block_and_body() {
        let raw = "---\ntitle: Hello\ndate: 2024-01-05\n---\n\n## Intro\nbody\n";
        let doc = split(raw).unwrap();
        assert_eq!(doc.block, "title: Hello\ndate: 2024-01-05");
        assert_eq!(doc.body, "\n## Intro\nbody\n");
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let doc = split("\n  \n---\ntitle: x\n---\nbody").unwrap();
        assert_eq!(doc.block, "title: x");
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn crlf_endings_are_tolerated() {
        let doc = split("---\r\ntitle: x\r\n---\r\n## A\r\n").unwrap();
        assert_eq!(doc.block, "title: x");
        assert_eq!(doc.body, "## A\r\n");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let doc = split("\u{feff}---\ntitle: Hello\n---\n## Intro\n").unwrap();
        assert_eq!(doc.block, "title: Hello");
        assert_eq!(doc.body, "## Intro\n");
    }

    #[test]
    fn structural_failures() {
        assert_eq!(split(""), Err(FrontmatterError::Empty));
        assert_eq!(split(" \n\n"), Err(FrontmatterError::Empty));
        assert_eq!(split("title: x\n---\n"), Err(FrontmatterError::MissingOpening));
        assert_eq!(split("---\ntitle: x\n"), Err(FrontmatterError::Unclosed));
    }

    #[test]
    fn heading_before_closing_delimiter_aborts() {
        let raw = "---\ntitle: x\n## Section\n\n---\nmore\n";
        assert_eq!(split(raw), Err(FrontmatterError::Unclosed));
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let doc = split("---\ntitle: x\n#comment\n---\nbody").unwrap();
        assert_eq!(doc.block, "title: x\n#comment");
    }

    #[test]
    fn line_cap_stops_the_scan() {
        let mut raw = String::from("---\n");
        for i in 0..MAX_FRONTMATTER_LINES {
            raw.push_str(&format!("k{i}: v\n"));
        }
        raw.push_str("---\nbody\n");
        assert_eq!(split(&raw), Err(FrontmatterError::Unclosed));

        let mut raw = String::from("---\n");
        for i in 0..MAX_FRONTMATTER_LINES - 1 {
            raw.push_str(&format!("k{i}: v\n"));
        }
        raw.push_str("---\nbody\n");
        assert!(split(&raw).is_ok());
    }

    #[test]
    fn body_separator_is_kept_in_body() {
        let doc = split("---\ntitle: x\n---\n## A\n---\ntext\n").unwrap();
        assert_eq!(doc.body, "## A\n---\ntext\n");
    }

    #[test]
    fn resplitting_reconstruction_is_stable() {
        let raw = "---\ntitle: x\ntags: [a, b]\n---\n\n## A\n\n---\nend";
        let first = split(raw).unwrap();
        let rebuilt = format!("---\n{}\n---\n{}", first.block, first.body);
        let second = split(&rebuilt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parses_mapping() {
        let doc = parse("---\ntitle: \"Rust Basics\"\ndate: 2024-03-01\ntags:\n  - rust\n  - 1\n---\nbody").unwrap();
        let fm = Frontmatter::from_mapping(&doc.metadata);
        assert_eq!(fm.title.as_deref(), Some("Rust Basics"));
        assert_eq!(fm.date.as_deref(), Some("2024-03-01"));
        assert_eq!(fm.summary, None);
        assert_eq!(fm.tags, vec!["rust".to_string()]);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn empty_block_is_empty_mapping() {
        let doc = parse("---\n---\nbody").unwrap();
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn yaml_errors_are_their_own_kind() {
        assert!(matches!(parse("---\ntitle: [unclosed\n---\nbody"), Err(FrontmatterError::Yaml(_))));
        assert!(matches!(parse("---\n- a\n- b\n---\nbody"), Err(FrontmatterError::Yaml(_))));
    }

    #[test]
    fn tag_normalization() {
        assert!(normalize_tags(None).is_empty());
        assert_eq!(normalize_tags(Some(&Value::String("x".into()))), vec!["x"]);
        let mixed: Value = serde_yaml::from_str("[a, 1, b]").unwrap();
        assert_eq!(normalize_tags(Some(&mixed)), vec!["a", "b"]);
        assert!(normalize_tags(Some(&Value::Bool(true))).is_empty());
    }

    #[test]
    fn blank_title_counts_as_absent() {
        let doc = parse("---\ntitle: \"  \"\n---\n").unwrap();
        assert_eq!(Frontmatter::from_mapping(&doc.metadata).title, None);
    }
}
