//! postshelf - a markdown blog served straight from a directory of posts
//!
//! Posts are plain `.md` files with a `---` frontmatter block. Directories become
//! categories. Nothing is cached: every request re-reads the posts directory.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::{BlogError, FrontmatterError};
pub use types::{AppState, CategoryInfo, CategoryNode, MatchedFields, Post, PostMeta, SearchResult};
pub use services::{FileService, MarkdownService, PostRepository, SearchService};
