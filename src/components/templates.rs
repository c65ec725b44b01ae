use std::fs;
use std::path::PathBuf;
use log::debug;
use crate::types::{CategoryInfo, PostMeta, SearchResult, TemplateContext};
use crate::utils::{escape_attr, escape_html};

/// Component for handling HTML template rendering
pub struct TemplateComponent {
    static_dir: PathBuf,
}

impl TemplateComponent {
    /// Create a new template component
    pub fn new(static_dir: PathBuf) -> Self {
        Self { static_dir }
    }

    /// Load and render the main HTML shell template
    pub fn render_shell_template(&self, context: &TemplateContext) -> String {
        let base_path = self.static_dir.join("html/base.html");
        if let Ok(base) = fs::read_to_string(&base_path) {
            debug!("Rendering with shell template {:?}", base_path);
            return base
                .replace("{{TITLE}}", &escape_html(&context.title))
                .replace("{{SIDEBAR}}", &context.sidebar)
                .replace("{{CONTENT}}", &context.content);
        }

        // Fallback inline shell
        format!(
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{}</title><link rel=\"stylesheet\" href=\"/static/css/blog.css\"></head><body><div class=\"layout\"><aside class=\"sidebar\"><form class=\"search\" action=\"/search\" method=\"get\"><input type=\"search\" name=\"q\" placeholder=\"Search...\"></form>{}</aside><main class=\"content\">{}</main></div></body></html>",
            escape_html(&context.title),
            context.sidebar,
            context.content
        )
    }

    /// Generate a complete page with navigation and content
    pub fn render_page(&self, title: &str, sidebar: &str, content: &str) -> String {
        self.render_shell_template(&TemplateContext {
            title: title.to_string(),
            content: content.to_string(),
            sidebar: sidebar.to_string(),
        })
    }
}

/// Post cards for listings
pub fn render_post_list(posts: &[PostMeta]) -> String {
    if posts.is_empty() {
        return "<p class=\"no-posts\">No posts yet.</p>".to_string();
    }
    let mut html = String::from("<ul class=\"post-list\">");
    for post in posts {
        html.push_str("<li class=\"post-card\">");
        html.push_str(&format!(
            "<h3><a href=\"{}\">{}</a></h3>",
            escape_attr(&post_href(post)),
            escape_html(&post.title)
        ));
        html.push_str(&format!("<p class=\"post-meta\"><time>{}</time>", escape_html(&post.date)));
        if !post.category.is_empty() {
            html.push_str(&format!(" &middot; {}", escape_html(&post.category)));
        }
        html.push_str("</p>");
        if let Some(summary) = &post.summary {
            html.push_str(&format!("<p class=\"post-summary\">{}</p>", escape_html(summary)));
        }
        html.push_str(&render_tags(&post.tags));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

/// Header of a post page: title, date, tags
pub fn render_post_header(post: &PostMeta) -> String {
    format!(
        "<header class=\"post-header\"><h1>{}</h1><p class=\"post-meta\"><time>{}</time></p>{}</header>",
        escape_html(&post.title),
        escape_html(&post.date),
        render_tags(&post.tags)
    )
}

/// Category heading with breadcrumbs and subcategory links
pub fn render_category_header(info: &CategoryInfo, category_path: &str) -> String {
    let mut html = String::from("<nav class=\"breadcrumbs\"><a href=\"/\">Home</a>");
    let mut prefix = String::from("/post");
    for segment in category_path.split('/').filter(|s| !s.is_empty()) {
        prefix.push('/');
        prefix.push_str(segment);
        html.push_str(&format!(
            " / <a href=\"{}\">{}</a>",
            escape_attr(&prefix),
            escape_html(segment)
        ));
    }
    html.push_str("</nav>");
    html.push_str(&format!(
        "<h1>{}</h1><p class=\"post-count\">{} post{}</p>",
        escape_html(&info.name),
        info.total_posts(),
        if info.total_posts() == 1 { "" } else { "s" }
    ));
    if !info.subcategories.is_empty() {
        html.push_str("<ul class=\"subcategories\">");
        for sub in &info.subcategories {
            html.push_str(&format!(
                "<li><a href=\"{}\">{}</a> ({})</li>",
                escape_attr(&sub.path),
                escape_html(&sub.name),
                sub.total_posts()
            ));
        }
        html.push_str("</ul>");
    }
    html
}

/// Render search results HTML
pub fn render_search_results(query: &str, results: &[SearchResult]) -> String {
    let mut content = String::from("<div class=\"search-results\">");
    if query.trim().is_empty() {
        content.push_str("<p class=\"no-query\">Enter a search query to find posts.</p></div>");
        return content;
    }

    content.push_str(&format!("<h2 class=\"search-header\">Search Results for \"{}\"</h2>", escape_html(query)));
    content.push_str(&format!(
        "<p class=\"results-count\">Found {} result{}</p>",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    ));

    if results.is_empty() {
        content.push_str("<p class=\"no-results\">No results found for your search.</p>");
    } else {
        content.push_str("<div class=\"search-results-list\">");
        for result in results {
            let fields = &result.matched_fields;
            let matched: Vec<&str> = [
                (fields.title, "title"),
                (fields.summary, "summary"),
                (fields.tags, "tags"),
                (fields.content, "content"),
            ]
            .into_iter()
            .filter_map(|(hit, name)| hit.then_some(name))
            .collect();

            content.push_str("<div class=\"search-result-item\">");
            content.push_str(&format!(
                "<h3 class=\"result-title\"><a href=\"{}\">{}</a></h3>",
                escape_attr(&post_href(&result.post)),
                escape_html(&result.post.title)
            ));
            if let Some(summary) = &result.post.summary {
                content.push_str(&format!("<p class=\"result-excerpt\">{}</p>", escape_html(summary)));
            }
            content.push_str(&format!(
                "<div class=\"result-meta\">Matched: {} &middot; Relevance: {}</div>",
                matched.join(", "),
                result.relevance_score
            ));
            content.push_str("</div>");
        }
        content.push_str("</div>");
    }

    content.push_str("</div>");
    content
}

/// URL of a post page
pub fn post_href(post: &PostMeta) -> String {
    if post.category.is_empty() {
        format!("/post/{}", post.slug)
    } else {
        format!("/post/{}/{}", post.category, post.slug)
    }
}

fn render_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: String = tags
        .iter()
        .map(|tag| format!("<span class=\"tag\">#{}</span>", escape_html(tag)))
        .collect();
    format!("<div class=\"tags\">{}</div>", items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchedFields;

    fn meta(category: &str, slug: &str) -> PostMeta {
        PostMeta {
            title: "T <1>".into(),
            date: "2024-01-01".into(),
            category: category.into(),
            slug: slug.into(),
            full_path: format!("{category}/{slug}.md"),
            summary: Some("sum".into()),
            tags: vec!["rust".into()],
        }
    }

    #[test]
    fn hrefs_for_root_and_nested_posts() {
        assert_eq!(post_href(&meta("", "about")), "/post/about");
        assert_eq!(post_href(&meta("dev/rust", "traits")), "/post/dev/rust/traits");
    }

    #[test]
    fn post_list_escapes_and_links() {
        let html = render_post_list(&[meta("dev", "x")]);
        assert!(html.contains("href=\"/post/dev/x\""));
        assert!(html.contains("T &lt;1&gt;"));
        assert!(html.contains("#rust"));
    }

    #[test]
    fn search_results_list_matched_fields() {
        let result = SearchResult {
            post: meta("dev", "x"),
            matched_fields: MatchedFields { title: true, content: true, ..Default::default() },
            relevance_score: 11,
        };
        let html = render_search_results("rust", &[result]);
        assert!(html.contains("Found 1 result<"));
        assert!(html.contains("Matched: title, content"));
    }

    #[test]
    fn fallback_shell_when_no_template() {
        let templates = TemplateComponent::new(PathBuf::from("/nonexistent/static"));
        let page = templates.render_page("Home", "<nav></nav>", "<p>hi</p>");
        assert!(page.contains("<title>Home</title>"));
        assert!(page.contains("<main class=\"content\"><p>hi</p></main>"));
    }
}
