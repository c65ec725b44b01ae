use log::{debug, info};
use crate::services::PostRepository;
use crate::types::CategoryNode;
use crate::utils::{escape_attr, escape_html};

/// Component for building the sidebar from the category tree
pub struct NavigationComponent {
    repository: PostRepository,
}

impl NavigationComponent {
    /// Create a new navigation component
    pub fn new(repository: PostRepository) -> Self {
        debug!("Creating new NavigationComponent");
        Self { repository }
    }

    /// Build sidebar HTML with table of contents
    pub fn build_sidebar_with_toc(&self, current_path: &str, toc: &str) -> String {
        let mut html = self.build_sidebar_html(current_path);
        if !toc.is_empty() {
            html.push_str("<div class=\"sidebar-toc\"><h4 class=\"sidebar-toc-title\">On This Page</h4>");
            html.push_str(toc);
            html.push_str("</div>");
        }
        html
    }

    /// Build the sidebar for a page at `current_path` (a `/post/...` URL)
    pub fn build_sidebar_html(&self, current_path: &str) -> String {
        let start_time = std::time::Instant::now();
        let tree = self.repository.build_category_tree();
        let html = render_tree(&tree, current_path);
        info!(
            "Sidebar built in {:?}ms for path: '{}'",
            start_time.elapsed().as_millis(),
            current_path
        );
        html
    }
}

/// Render a category tree as nested lists; branches holding `current_path` start open
pub fn render_tree(tree: &[CategoryNode], current_path: &str) -> String {
    let mut html = String::from("<nav class=\"sidebar-nav\"><div class=\"sidebar-title\">Categories</div>");
    render_nodes(tree, current_path, &mut html);
    html.push_str("</nav>");
    html
}

fn render_nodes(nodes: &[CategoryNode], current_path: &str, html: &mut String) {
    html.push_str("<ul class=\"nav-list\">");
    for node in nodes {
        let active = if current_path == node.path { " class=\"active\"" } else { "" };
        let link = format!(
            "<a{} href=\"{}\">{}</a>",
            active,
            escape_attr(&node.path),
            escape_html(&node.name)
        );
        match &node.children {
            Some(children) if node.is_directory => {
                let open = if is_in_branch(current_path, &node.path) { " open" } else { "" };
                html.push_str("<li class=\"nav-item dir\">");
                html.push_str(&format!("<details{}><summary>{}</summary>", open, link));
                render_nodes(children, current_path, html);
                html.push_str("</details></li>");
            }
            _ => {
                html.push_str("<li class=\"nav-item file\">");
                html.push_str(&link);
                html.push_str("</li>");
            }
        }
    }
    html.push_str("</ul>");
}

fn is_in_branch(current_path: &str, branch: &str) -> bool {
    current_path == branch
        || current_path
            .strip_prefix(branch)
            .is_some_and(|rest| rest.starts_with('/'))
}
