use std::fs;
use std::path::Path;

use tempfile::TempDir;

#[allow(dead_code)]
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small blog: two categories, a nested one, a root post and one broken file
pub fn sample_blog() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "dev/rust-basics.md",
        "---\ntitle: Rust Basics\ndate: 2024-03-01\nsummary: Ownership and borrowing\ntags: [rust]\n---\n## Start\nLearn the borrow checker.\n",
    );
    write(
        root,
        "dev/go-intro.md",
        "---\ntitle: Go Intro\ndate: 2024-02-01\nsummary: rust comparison\ntags: go\n---\n## Go\nGoroutines.\n",
    );
    write(
        root,
        "dev/web/axum.md",
        "---\ntitle: Axum routing\ndate: 2024-04-10\ntags: [web, 7]\n---\n## Routes\nUses tokio and hyper.\n",
    );
    write(
        root,
        "life/reading.md",
        "---\ntitle: Reading list\ndate: 2023-12-24\n---\n## Books\n\n---\nMore later.\n",
    );
    write(root, "hello.md", "---\ntitle: Hello\ndate: 2024-01-01\n---\n## Hi\n");
    write(root, "life/draft.md", "# Untitled\n\nno frontmatter\n");
    dir
}
