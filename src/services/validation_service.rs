//! Offline content checks run by the `validate-posts` binary.
//!
//! Unlike the serving path, which skips files it cannot parse, validation reports
//! every problem it finds in every file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use log::debug;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::errors::BlogError;
use crate::services::frontmatter;
use crate::types::FileReport;
use crate::utils::is_markdown;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));
static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{3,}\s*$").expect("separator pattern is valid"));

/// Validate every markdown file below `root`, returning only files with errors
pub fn validate_dir(root: &Path) -> Result<(usize, Vec<FileReport>), BlogError> {
    let mut files = Vec::new();
    collect_markdown_files(root, &mut files)?;

    let mut failures = Vec::new();
    for path in &files {
        let errors = validate_file(path).unwrap_or_else(|e| vec![format!("cannot read file: {e}")]);
        if !errors.is_empty() {
            failures.push(FileReport { path: path.clone(), errors });
        }
    }
    Ok((files.len(), failures))
}

/// Validate a single file on disk; invalid UTF-8 is decoded lossily
pub fn validate_file(path: &Path) -> Result<Vec<String>, BlogError> {
    debug!("Validating {:?}", path);
    let bytes = fs::read(path)?;
    Ok(validate_source(&String::from_utf8_lossy(&bytes)))
}

/// All problems found in one document's text
pub fn validate_source(raw: &str) -> Vec<String> {
    let document = match frontmatter::parse(raw) {
        Ok(document) => document,
        Err(e) => return vec![e.to_string()],
    };

    let mut errors = check_fields(&document.metadata);
    check_body(document.body, &mut errors);
    errors
}

fn check_fields(metadata: &Mapping) -> Vec<String> {
    let mut errors = Vec::new();

    if non_empty_string(metadata.get("title")).is_none() {
        errors.push("frontmatter.title is required (non-empty string)".to_string());
    }
    if non_empty_string(metadata.get("summary")).is_none() {
        errors.push("frontmatter.summary is required (non-empty string)".to_string());
    }
    let date_ok = non_empty_string(metadata.get("date"))
        .is_some_and(|date| DATE_PATTERN.is_match(date.trim()));
    if !date_ok {
        errors.push("frontmatter.date is required (format: \"YYYY-MM-DD\")".to_string());
    }

    let tags_ok = match metadata.get("tags") {
        None | Some(Value::Null) | Some(Value::String(_)) => true,
        Some(Value::Sequence(items)) => items.iter().all(Value::is_string),
        Some(_) => false,
    };
    if !tags_ok {
        errors.push("frontmatter.tags must be a string[] (or string)".to_string());
    }

    errors
}

fn check_body(body: &str, errors: &mut Vec<String>) {
    let Some(first_line) = body.lines().find(|line| !line.trim().is_empty()) else {
        errors.push("markdown body is empty".to_string());
        return;
    };

    let trimmed = first_line.trim();
    if SEPARATOR_LINE.is_match(first_line) {
        errors.push("body starts with a separator line; remove it and start with '##'".to_string());
        errors.push("body should start with a '## ' heading".to_string());
    } else if trimmed.starts_with("# ") {
        errors.push("do not use H1 ('# ...'); start sections with '##'".to_string());
    } else if !trimmed.starts_with("## ") {
        errors.push("body should start with a '## ' heading".to_string());
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn collect_markdown_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BlogError> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            collect_markdown_files(&path, out)?;
        } else if file_type.is_file() && is_markdown(&entry.file_name().to_string_lossy()) {
            out.push(path);
        }
    }
    Ok(())
}
