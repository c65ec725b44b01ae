use log::{error, info};
use tokio::net::TcpListener;

use postshelf::logger::Logger;
use postshelf::{handlers, BlogError, Config};

#[tokio::main]
async fn main() -> Result<(), BlogError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env();
    if !config.posts_dir.is_dir() {
        error!("Posts directory {:?} does not exist", config.posts_dir);
        return Err(BlogError::NotFound(config.posts_dir.to_string_lossy().to_string()));
    }

    let app = handlers::router(config.app_state());
    let addr = config.socket_addr()?;
    info!("Blog listening on http://{} (posts from {:?})", addr, config.posts_dir);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(BlogError::from)
}
