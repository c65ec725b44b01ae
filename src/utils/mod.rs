use std::path::{Component, Path};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::errors::BlogError;

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape HTML attribute values
pub fn escape_attr(text: &str) -> String {
    escape_html(text)
}

/// Normalize request path
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Reject paths that would escape the posts root
pub fn ensure_safe_path(req_path: &str) -> Result<(), BlogError> {
    for comp in Path::new(req_path).components() {
        match comp {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(BlogError::InvalidPath);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Check if a file name has the markdown extension
pub fn is_markdown(name: &str) -> bool {
    name.len() > 3 && name.ends_with(".md")
}

/// Today's calendar date (UTC) as `YYYY-MM-DD`
pub fn today_iso() -> String {
    OffsetDateTime::now_utc().date().to_string()
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_iso_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Determine content type for a file based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()) {
        Some(ref ext) if ext == "html" => "text/html; charset=utf-8",
        Some(ref ext) if ext == "css" => "text/css; charset=utf-8",
        Some(ref ext) if ext == "js" => "application/javascript; charset=utf-8",
        Some(ref ext) if ext == "json" => "application/json; charset=utf-8",
        Some(ref ext) if ext == "svg" => "image/svg+xml",
        Some(ref ext) if ext == "png" => "image/png",
        Some(ref ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ref ext) if ext == "gif" => "image/gif",
        Some(ref ext) if ext == "ico" => "image/x-icon",
        Some(ref ext) if ext == "txt" => "text/plain; charset=utf-8",
        Some(ref ext) if ext == "md" => "text/markdown; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_slashes_and_dots() {
        assert_eq!(normalize_path("/dev//rust/./intro/"), "dev/rust/intro");
        assert_eq!(normalize_path("/"), "");
    }

    #[test]
    fn parent_segments_are_rejected() {
        assert!(ensure_safe_path("dev/rust").is_ok());
        assert!(matches!(ensure_safe_path("../etc"), Err(BlogError::InvalidPath)));
        assert!(matches!(ensure_safe_path("/etc/passwd"), Err(BlogError::InvalidPath)));
    }

    #[test]
    fn iso_dates() {
        assert!(parse_iso_date("2024-02-29").is_some());
        assert!(parse_iso_date("2023-02-29").is_none());
        assert!(parse_iso_date("2024/01/01").is_none());
        assert_eq!(today_iso().len(), 10);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
