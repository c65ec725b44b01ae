use std::io;
use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

/// Structural problems with a post's metadata block
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrontmatterError {
    #[error("file is empty")]
    Empty,
    #[error("frontmatter must start at the first line with '---'")]
    MissingOpening,
    #[error("frontmatter must be closed with '---' before the markdown body starts")]
    Unclosed,
    #[error("frontmatter parse error: {0}")]
    Yaml(String),
}

/// Error type shared by the repository, search, and HTTP layers
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid path")]
    InvalidPath,
    #[error("query parameter 'q' is required")]
    EmptyQuery,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BlogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound(_))
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = match &self {
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::InvalidPath | BlogError::EmptyQuery => StatusCode::BAD_REQUEST,
            BlogError::Io(_) | BlogError::Frontmatter(_) | BlogError::InvalidConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
