use std::collections::HashMap;
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::types::MarkdownResult;
use crate::utils::{escape_attr, escape_html};

/// Heading collected during the first pass: (level, id, text)
type Heading = (u32, String, String);

/// Renders post bodies as GitHub-flavored markdown; raw HTML passes through untouched
pub struct MarkdownService {
    options: Options,
}

impl MarkdownService {
    /// Create a new markdown service
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }

    /// Render markdown with heading anchors and a table of contents
    pub fn render(&self, content: &str) -> MarkdownResult {
        let headings = self.collect_headings(content);

        let mut out = String::new();
        let mut idx = 0usize;
        let mut id_stack: Vec<(u32, String)> = Vec::new();
        for ev in Parser::new_ext(content, self.options) {
            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let lvl = heading_level_to_u32(level);
                    let id = headings.get(idx).map(|(_, id, _)| id.clone()).unwrap_or_default();
                    out.push_str(&format!("<h{} id=\"{}\">", lvl, escape_attr(&id)));
                    id_stack.push((lvl, id));
                    idx += 1;
                }
                Event::End(TagEnd::Heading(level)) => {
                    let (lvl, id) = id_stack
                        .pop()
                        .unwrap_or_else(|| (heading_level_to_u32(level), String::new()));
                    out.push_str(&format!(
                        "<a class=\"hlink\" href=\"#{}\" aria-label=\"Link to this section\">#</a></h{}>\n",
                        escape_attr(&id),
                        lvl
                    ));
                }
                _ => html::push_html(&mut out, std::iter::once(ev)),
            }
        }

        MarkdownResult {
            html: out,
            toc: build_toc_html(&headings),
        }
    }

    fn collect_headings(&self, content: &str) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut in_heading: Option<u32> = None;
        let mut buf = String::new();
        let mut id_counts: HashMap<String, usize> = HashMap::new();

        for ev in Parser::new_ext(content, self.options) {
            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    in_heading = Some(heading_level_to_u32(level));
                    buf.clear();
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(lvl) = in_heading.take() {
                        let mut id = slugify(&buf);
                        if id.is_empty() {
                            id = format!("h{}", lvl);
                        }
                        let count = id_counts.entry(id.clone()).or_insert(0);
                        if *count > 0 {
                            id = format!("{}-{}", id, *count);
                        }
                        *count += 1;
                        headings.push((lvl, id, buf.trim().to_string()));
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    if in_heading.is_some() {
                        buf.push_str(&t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if in_heading.is_some() {
                        buf.push(' ');
                    }
                }
                _ => {}
            }
        }
        headings
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Build HTML for the Table of Contents
fn build_toc_html(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let mut html = String::from("<nav class=\"toc\"><div class=\"toc-title\">Contents</div>");
    let mut current = 0u32;
    for (level, id, title) in headings {
        while current < *level {
            html.push_str("<ul>");
            current += 1;
        }
        while current > *level {
            html.push_str("</ul>");
            current -= 1;
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>",
            escape_attr(id),
            escape_html(title)
        ));
    }
    while current > 0 {
        html.push_str("</ul>");
        current -= 1;
    }
    html.push_str("</nav>");
    html
}

fn heading_level_to_u32(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Create URL-friendly slug from text
fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}
