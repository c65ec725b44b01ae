use axum::{
    extract::{Path as AxumPath, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::components::pagination::{paginate, render_pagination};
use crate::components::templates::{
    render_category_header, render_post_header, render_post_list, render_search_results,
};
use crate::components::{NavigationComponent, TemplateComponent};
use crate::errors::BlogError;
use crate::services::{MarkdownService, PostRepository, SearchService};
use crate::types::{AppState, CategoryNode, PostMeta, SearchResult};
use crate::utils::{content_type_for, ensure_safe_path, normalize_path};

/// Longest query accepted before it is cut down
pub const MAX_QUERY_CHARS: usize = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

impl PageParams {
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostsParams {
    category: Option<String>,
}

/// All routes of the blog
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/post/*path", get(handle_post_path))
        .route("/search", get(handle_search))
        .route("/api/posts", get(handle_api_posts))
        .route("/api/categories", get(handle_api_categories))
        .route("/api/search", get(handle_api_search))
        .route("/static/*path", get(handle_static))
        .with_state(state)
}

fn repository(state: &AppState) -> PostRepository {
    PostRepository::new(state.posts_dir.as_ref().clone())
}

fn templates(state: &AppState) -> TemplateComponent {
    TemplateComponent::new(state.static_dir.as_ref().clone())
}

/// Handle root path requests: newest posts, paginated
pub async fn handle_root(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, BlogError> {
    let repo = repository(&state);
    let posts = repo.list_all_posts();
    let page = paginate(&posts, params.page(), state.posts_per_page);

    let mut content = String::from("<h1>Recent posts</h1>");
    content.push_str(&render_post_list(page.items));
    content.push_str(&render_pagination(page.current, page.total_pages, "/"));

    let sidebar = NavigationComponent::new(repo).build_sidebar_html("/");
    Ok(Html(templates(&state).render_page("Home", &sidebar, &content)))
}

/// Handle `/post/...`: a category listing if the path is a directory, otherwise a post
pub async fn handle_post_path(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, BlogError> {
    log::info!("Post path request received: '{}'", path);
    let normalized = normalize_path(&path);
    let repo = repository(&state);
    let current_url = format!("/post/{}", normalized);

    match repo.get_category_info(&normalized) {
        Ok(info) => {
            let page = paginate(&info.posts, params.page(), state.posts_per_page);
            let mut content = render_category_header(&info, &normalized);
            content.push_str(&render_post_list(page.items));
            content.push_str(&render_pagination(page.current, page.total_pages, &current_url));

            let sidebar = NavigationComponent::new(repo).build_sidebar_html(&current_url);
            let title = if info.name.is_empty() { "All posts" } else { info.name.as_str() };
            log::info!("Serving category page for: '{}'", normalized);
            return Ok(Html(templates(&state).render_page(title, &sidebar, &content)));
        }
        Err(e) if e.is_not_found() => {
            log::debug!("'{}' is not a category, trying it as a post", normalized);
        }
        Err(e) => return Err(e),
    }

    let (category, slug) = normalized.rsplit_once('/').unwrap_or(("", normalized.as_str()));
    let post = repo.get_post(category, slug)?;
    let rendered = MarkdownService::new().render(&post.body);

    let mut content = render_post_header(&post.meta);
    content.push_str("<article class=\"post-body\">");
    content.push_str(&rendered.html);
    content.push_str("</article>");

    let sidebar = NavigationComponent::new(repo).build_sidebar_with_toc(&current_url, &rendered.toc);
    log::info!("Serving post: '{}'", normalized);
    Ok(Html(templates(&state).render_page(&post.meta.title, &sidebar, &content)))
}

/// Handle search page requests
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, BlogError> {
    let query = params.q.unwrap_or_default();
    let query = truncate_query(&query);
    let repo = repository(&state);

    let results = if query.trim().is_empty() {
        Vec::new()
    } else {
        SearchService::new(repo.clone()).search(query)?
    };

    let content = render_search_results(query, &results);
    let sidebar = NavigationComponent::new(repo).build_sidebar_html("/search");
    let title = format!("Search: {}", query.trim());
    Ok(Html(templates(&state).render_page(&title, &sidebar, &content)))
}

/// `GET /api/posts[?category=...]`
pub async fn handle_api_posts(
    State(state): State<AppState>,
    Query(params): Query<PostsParams>,
) -> Json<Vec<PostMeta>> {
    let repo = repository(&state);
    let posts = match params.category.as_deref() {
        Some(category) if !category.is_empty() => repo.get_posts_by_category(category),
        _ => repo.list_all_posts(),
    };
    Json(posts)
}

/// `GET /api/categories`
pub async fn handle_api_categories(State(state): State<AppState>) -> Json<Vec<CategoryNode>> {
    Json(repository(&state).build_category_tree())
}

/// `GET /api/search?q=...`
pub async fn handle_api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, BlogError> {
    let query = params.q.ok_or(BlogError::EmptyQuery)?;
    let results = SearchService::new(repository(&state)).search(truncate_query(&query))?;
    Ok(Json(results))
}

/// Handle static file requests
pub async fn handle_static(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response, BlogError> {
    let normalized = normalize_path(&path);
    ensure_safe_path(&normalized)?;
    let requested = state.static_dir.join(&normalized);

    if !requested.is_file() {
        return Err(BlogError::NotFound(normalized));
    }

    let bytes = std::fs::read(&requested)?;
    let content_type = content_type_for(&requested);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn truncate_query(query: &str) -> &str {
    match query.char_indices().nth(MAX_QUERY_CHARS) {
        Some((idx, _)) => {
            log::warn!("Very long search query received, truncating to {} chars", MAX_QUERY_CHARS);
            &query[..idx]
        }
        None => query,
    }
}
