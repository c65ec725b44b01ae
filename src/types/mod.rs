use std::sync::Arc;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub posts_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub posts_per_page: usize,
}

/// Directory entry information
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub path: PathBuf,
}

/// Listing view of a single markdown post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub title: String,
    pub date: String,
    pub category: String,
    pub slug: String,
    pub full_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A post together with its raw markdown body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,
    pub body: String,
}

/// Node of the navigation tree: a category directory or a post leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_post: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryNode>>,
}

/// Expanded view of one category with its posts and nested subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub path: String,
    pub posts: Vec<PostMeta>,
    pub subcategories: Vec<CategoryInfo>,
}

impl CategoryInfo {
    /// Number of posts in this category and every subcategory below it
    pub fn total_posts(&self) -> usize {
        self.posts.len() + self.subcategories.iter().map(CategoryInfo::total_posts).sum::<usize>()
    }
}

/// Which fields of a post matched a search query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedFields {
    pub title: bool,
    pub summary: bool,
    pub tags: bool,
    pub content: bool,
}

/// Search result information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub post: PostMeta,
    pub matched_fields: MatchedFields,
    pub relevance_score: u32,
}

/// Validation errors collected for one post file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub errors: Vec<String>,
}

/// Markdown rendering result
#[derive(Debug, Clone)]
pub struct MarkdownResult {
    pub html: String,
    pub toc: String,
}

/// Template rendering context
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub title: String,
    pub content: String,
    pub sidebar: String,
}
