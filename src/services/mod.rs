pub mod file_service;
pub mod frontmatter;
pub mod markdown_service;
pub mod post_repository;
pub mod search_service;
pub mod validation_service;

pub use file_service::FileService;
pub use markdown_service::MarkdownService;
pub use post_repository::PostRepository;
pub use search_service::SearchService;
