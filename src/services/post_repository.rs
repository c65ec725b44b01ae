use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::errors::BlogError;
use crate::services::FileService;
use crate::services::frontmatter::{self, Frontmatter, ParsedDocument};
use crate::types::{CategoryInfo, CategoryNode, Post, PostMeta};
use crate::utils::{ensure_safe_path, is_markdown, normalize_path, parse_iso_date, today_iso};

/// URL prefix every category and post link lives under
pub const POST_URL_PREFIX: &str = "/post";

/// Read-only view of the posts directory.
///
/// Nothing is cached: every call walks the filesystem again, so results always
/// reflect what is on disk at the time of the call.
#[derive(Clone)]
pub struct PostRepository {
    files: FileService,
}

impl PostRepository {
    pub fn new(posts_dir: PathBuf) -> Self {
        Self { files: FileService::new(posts_dir) }
    }

    /// Every parsable post, newest first
    pub fn list_all_posts(&self) -> Vec<PostMeta> {
        let start_time = std::time::Instant::now();
        let mut paths = Vec::new();
        self.collect_markdown_files(Path::new(""), &mut paths);

        let mut posts = Vec::with_capacity(paths.len());
        for path in paths {
            match self.read_post(&path) {
                Ok(post) => posts.push(post.meta),
                Err(e) => warn!("Skipping post {:?}: {}", path, e),
            }
        }
        sort_by_date_desc(&mut posts);

        info!(
            "Listed {} posts in {:?}ms",
            posts.len(),
            start_time.elapsed().as_millis()
        );
        posts
    }

    /// Posts whose category is exactly `category`
    pub fn get_posts_by_category(&self, category: &str) -> Vec<PostMeta> {
        let category = normalize_path(category);
        self.list_all_posts()
            .into_iter()
            .filter(|post| post.category == category)
            .collect()
    }

    /// Load `{category}/{slug}.md` with its body
    pub fn get_post(&self, category: &str, slug: &str) -> Result<Post, BlogError> {
        let category = normalize_path(category);
        ensure_safe_path(&category)?;
        if slug.is_empty() || slug == ".." || slug.contains(std::path::is_separator) {
            return Err(BlogError::InvalidPath);
        }

        let relative = Path::new(&category).join(format!("{slug}.md"));
        if !self.files.file_exists(&relative) {
            return Err(BlogError::NotFound(join_segments(&category, slug)));
        }
        self.read_post(&relative)
    }

    /// Navigation tree mirroring the directory layout
    pub fn build_category_tree(&self) -> Vec<CategoryNode> {
        self.tree_nodes(Path::new(""))
    }

    /// Posts and nested subcategories below `category_path`
    pub fn get_category_info(&self, category_path: &str) -> Result<CategoryInfo, BlogError> {
        let category = normalize_path(category_path);
        ensure_safe_path(&category)?;
        if !self.files.dir_exists(Path::new(&category)) {
            return Err(BlogError::NotFound(category));
        }
        self.category_info(&category)
    }

    /// Every directory below the root, parents before children
    pub fn all_category_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_category_paths(Path::new(""), &mut paths);
        paths
    }

    /// `(category, slug)` for every markdown file, in discovery order
    pub fn all_post_paths(&self) -> Vec<(String, String)> {
        let mut paths = Vec::new();
        self.collect_markdown_files(Path::new(""), &mut paths);
        paths.iter().map(|path| split_post_path(path)).collect()
    }

    fn read_post(&self, relative: &Path) -> Result<Post, BlogError> {
        let content = self.files.read_file(relative)?;
        let document = frontmatter::parse(&content)?;
        let (category, slug) = split_post_path(relative);
        Ok(build_post(category, slug, url_path(relative), &document))
    }

    fn collect_markdown_files(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let entries = match self.files.list_directory(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {:?}, treating it as empty: {}", dir, e);
                return;
            }
        };
        for entry in entries {
            if entry.is_dir {
                self.collect_markdown_files(&entry.path, out);
            } else if is_markdown(&entry.name) {
                out.push(entry.path);
            }
        }
    }

    fn collect_category_paths(&self, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = self.files.list_directory(dir) else {
            warn!("Cannot list {:?}, skipping its categories", dir);
            return;
        };
        for entry in entries.into_iter().filter(|e| e.is_dir) {
            out.push(url_path(&entry.path));
            self.collect_category_paths(&entry.path, out);
        }
    }

    fn tree_nodes(&self, dir: &Path) -> Vec<CategoryNode> {
        let entries = match self.files.list_directory(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {:?} for the category tree: {}", dir, e);
                return Vec::new();
            }
        };

        let mut nodes = Vec::new();
        for entry in entries {
            let relative = url_path(&entry.path);
            if entry.is_dir {
                nodes.push(CategoryNode {
                    path: format!("{POST_URL_PREFIX}/{relative}"),
                    name: entry.name,
                    is_directory: true,
                    is_post: None,
                    children: Some(self.tree_nodes(&entry.path)),
                });
            } else if let Some(name) = entry.name.strip_suffix(".md").filter(|_| is_markdown(&entry.name)) {
                let relative = relative.strip_suffix(".md").unwrap_or(&relative);
                nodes.push(CategoryNode {
                    name: name.to_string(),
                    path: format!("{POST_URL_PREFIX}/{relative}"),
                    is_directory: false,
                    is_post: Some(true),
                    children: None,
                });
            }
        }
        nodes
    }

    fn category_info(&self, category: &str) -> Result<CategoryInfo, BlogError> {
        debug!("Building category info for '{}'", category);
        let entries = self.files.list_directory(Path::new(category))?;

        let mut posts = Vec::new();
        let mut subcategories = Vec::new();
        for entry in entries {
            if entry.is_dir {
                let child = join_segments(category, &entry.name);
                match self.category_info(&child) {
                    Ok(info) => subcategories.push(info),
                    Err(e) => {
                        warn!("Cannot read category '{}', showing it empty: {}", child, e);
                        subcategories.push(empty_category(&child));
                    }
                }
            } else if is_markdown(&entry.name) {
                match self.read_post(&entry.path) {
                    Ok(post) => posts.push(post.meta),
                    Err(e) => warn!("Skipping post {:?}: {}", entry.path, e),
                }
            }
        }
        sort_by_date_desc(&mut posts);

        let mut info = empty_category(category);
        info.posts = posts;
        info.subcategories = subcategories;
        Ok(info)
    }
}

/// Stable sort, newest first; unparsable dates go last
pub fn sort_by_date_desc(posts: &mut [PostMeta]) {
    posts.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
}

fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    match (parse_iso_date(a), parse_iso_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn build_post(category: String, slug: String, full_path: String, document: &ParsedDocument<'_>) -> Post {
    let fields = Frontmatter::from_mapping(&document.metadata);
    Post {
        meta: PostMeta {
            title: fields.title.unwrap_or_else(|| slug.clone()),
            date: fields.date.unwrap_or_else(today_iso),
            category,
            slug,
            full_path,
            summary: fields.summary,
            tags: fields.tags,
        },
        body: document.body.to_string(),
    }
}

fn empty_category(category: &str) -> CategoryInfo {
    CategoryInfo {
        name: category.rsplit('/').next().unwrap_or_default().to_string(),
        path: format!("{POST_URL_PREFIX}/{category}"),
        posts: Vec::new(),
        subcategories: Vec::new(),
    }
}

/// `(category, slug)` of a path relative to the posts root
fn split_post_path(relative: &Path) -> (String, String) {
    let slug = relative
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let slug = slug.strip_suffix(".md").unwrap_or(&slug).to_string();
    let category = relative.parent().map(url_path).unwrap_or_default();
    (category, slug)
}

/// Relative filesystem path as a `/`-joined string
fn url_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn join_segments(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {title}\ndate: {date}\n---\n## Body of {title}\n")
    }

    fn fixture() -> (TempDir, PostRepository) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "about.md", &post("About", "2023-01-01"));
        write(root, "dev/rust/ownership.md", &post("Ownership", "2024-05-01"));
        write(root, "dev/rust/traits.md", &post("Traits", "2024-05-01"));
        write(root, "dev/go.md", &post("Go", "2024-06-10"));
        write(root, "dev/broken.md", "no frontmatter here\n");
        write(root, "dev/notes.txt", "ignored");
        let repo = PostRepository::new(root.to_path_buf());
        (dir, repo)
    }

    #[test]
    fn lists_posts_newest_first_and_skips_broken_files() {
        let (_dir, repo) = fixture();
        let posts = repo.list_all_posts();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["go", "ownership", "traits", "about"]);
    }

    #[test]
    fn category_and_full_path_are_derived_from_directories() {
        let (_dir, repo) = fixture();
        let posts = repo.list_all_posts();
        let ownership = posts.iter().find(|p| p.slug == "ownership").unwrap();
        assert_eq!(ownership.category, "dev/rust");
        assert_eq!(ownership.full_path, "dev/rust/ownership.md");
        let about = posts.iter().find(|p| p.slug == "about").unwrap();
        assert_eq!(about.category, "");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bare.md", "---\ntags: solo\n---\ntext");
        let repo = PostRepository::new(dir.path().to_path_buf());
        let posts = repo.list_all_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "bare");
        assert_eq!(posts[0].date, today_iso());
        assert_eq!(posts[0].tags, vec!["solo"]);
        assert_eq!(posts[0].summary, None);
    }

    #[test]
    fn byte_order_mark_does_not_hide_a_post() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bom.md", "\u{feff}---\ntitle: Hello\ndate: 2024-01-05\n---\n## Hi\n");
        let repo = PostRepository::new(dir.path().to_path_buf());
        let posts = repo.list_all_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello");
    }

    #[cfg(unix)]
    #[test]
    fn backslash_in_file_name_is_loadable() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a\\b.md", &post("Odd", "2024-01-01"));
        let repo = PostRepository::new(dir.path().to_path_buf());
        let listed = repo.list_all_posts();
        assert_eq!(listed[0].slug, "a\\b");
        assert_eq!(repo.get_post("", "a\\b").unwrap().meta.title, "Odd");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_treated_as_empty() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "about.md", &post("About", "2023-01-01"));
        write(dir.path(), "locked/secret.md", &post("Secret", "2024-01-01"));
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Running with privileges that ignore permission bits.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let repo = PostRepository::new(dir.path().to_path_buf());
        let slugs: Vec<_> = repo.list_all_posts().into_iter().map(|p| p.slug).collect();
        let tree = repo.build_category_tree();
        let info = repo.get_category_info("");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(slugs, vec!["about"]);
        assert_eq!(tree[1].name, "locked");
        assert_eq!(tree[1].children, Some(Vec::new()));
        let info = info.unwrap();
        assert_eq!(info.subcategories.len(), 1);
        assert_eq!(info.subcategories[0].name, "locked");
        assert_eq!(info.subcategories[0].total_posts(), 0);
    }

    #[test]
    fn invalid_dates_sort_last() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", &post("A", "someday"));
        write(dir.path(), "b.md", &post("B", "2020-01-01"));
        let repo = PostRepository::new(dir.path().to_path_buf());
        let slugs: Vec<_> = repo.list_all_posts().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["b", "a"]);
    }

    #[test]
    fn missing_root_is_an_empty_listing() {
        let dir = TempDir::new().unwrap();
        let repo = PostRepository::new(dir.path().join("absent"));
        assert!(repo.list_all_posts().is_empty());
        assert!(repo.build_category_tree().is_empty());
    }

    #[test]
    fn get_post_returns_body_verbatim() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "dev/hello.md", "---\ntitle: Hello\n---\n\n## Hi\n\n---\nbye\n");
        let repo = PostRepository::new(dir.path().to_path_buf());
        let post = repo.get_post("dev", "hello").unwrap();
        assert_eq!(post.meta.title, "Hello");
        assert_eq!(post.body, "\n## Hi\n\n---\nbye\n");
    }

    #[test]
    fn get_post_errors() {
        let (_dir, repo) = fixture();
        assert!(repo.get_post("dev", "missing").unwrap_err().is_not_found());
        assert!(repo.get_post("nope", "go").unwrap_err().is_not_found());
        assert!(matches!(repo.get_post("../dev", "go"), Err(BlogError::InvalidPath)));
        assert!(matches!(repo.get_post("dev", "a/b"), Err(BlogError::InvalidPath)));
        assert!(matches!(repo.get_post("dev", "broken"), Err(BlogError::Frontmatter(_))));
    }

    #[test]
    fn posts_by_category_is_an_exact_match() {
        let (_dir, repo) = fixture();
        let slugs: Vec<_> = repo.get_posts_by_category("dev").into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["go"]);
        assert_eq!(repo.get_posts_by_category("/dev/rust/").len(), 2);
    }

    #[test]
    fn category_tree_mirrors_directories() {
        let (_dir, repo) = fixture();
        let tree = repo.build_category_tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "about");
        assert_eq!(tree[0].path, "/post/about");
        assert_eq!(tree[0].is_post, Some(true));
        assert!(tree[0].children.is_none());

        let dev = &tree[1];
        assert!(dev.is_directory);
        assert_eq!(dev.path, "/post/dev");
        let children = dev.children.as_ref().unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["broken", "go", "rust"]);
        let rust = &children[2];
        assert_eq!(rust.children.as_ref().unwrap()[0].path, "/post/dev/rust/ownership");
    }

    #[test]
    fn category_info_recurses() {
        let (_dir, repo) = fixture();
        let info = repo.get_category_info("dev").unwrap();
        assert_eq!(info.name, "dev");
        assert_eq!(info.path, "/post/dev");
        assert_eq!(info.posts.len(), 1);
        assert_eq!(info.subcategories.len(), 1);
        let rust = &info.subcategories[0];
        assert_eq!(rust.name, "rust");
        assert_eq!(rust.path, "/post/dev/rust");
        assert_eq!(rust.posts[0].category, "dev/rust");
        assert_eq!(info.total_posts(), 3);
    }

    #[test]
    fn category_info_not_found() {
        let (_dir, repo) = fixture();
        assert!(repo.get_category_info("nope").unwrap_err().is_not_found());
        assert!(repo.get_category_info("about.md").unwrap_err().is_not_found());
    }

    #[test]
    fn enumerates_paths() {
        let (_dir, repo) = fixture();
        assert_eq!(repo.all_category_paths(), vec!["dev", "dev/rust"]);
        let posts = repo.all_post_paths();
        assert!(posts.contains(&("dev/rust".to_string(), "traits".to_string())));
        assert!(posts.contains(&(String::new(), "about".to_string())));
        assert_eq!(posts.len(), 5);
    }
}
