use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use log::warn;

use crate::errors::BlogError;
use crate::types::AppState;

pub const DEFAULT_PORT: u16 = 5004;
pub const DEFAULT_POSTS_PER_PAGE: usize = 5;

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    pub posts_dir: PathBuf,
    pub static_dir: PathBuf,
    pub port: u16,
    pub host: String,
    pub posts_per_page: usize,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            posts_dir: PathBuf::from("posts"),
            static_dir: PathBuf::from("static"),
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
        }
    }

    /// Build configuration from `POSTSHELF_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(dir) = lookup("POSTSHELF_POSTS_DIR") {
            config.posts_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("POSTSHELF_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("POSTSHELF_HOST") {
            config.host = host;
        }
        if let Some(raw) = lookup("POSTSHELF_PORT") {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid POSTSHELF_PORT '{}', using {}", raw, config.port),
            }
        }
        if let Some(raw) = lookup("POSTSHELF_POSTS_PER_PAGE") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.posts_per_page = n,
                _ => warn!(
                    "Ignoring invalid POSTSHELF_POSTS_PER_PAGE '{}', using {}",
                    raw, config.posts_per_page
                ),
            }
        }
        config
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, BlogError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| BlogError::InvalidConfig(format!("{}:{} ({})", self.host, self.port, e)))
    }

    /// Shared handler state derived from this configuration
    pub fn app_state(&self) -> AppState {
        AppState {
            posts_dir: Arc::new(self.posts_dir.clone()),
            static_dir: Arc::new(self.static_dir.clone()),
            posts_per_page: self.posts_per_page,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
