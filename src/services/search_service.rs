use log::{debug, info, warn};
use crate::errors::BlogError;
use crate::types::{MatchedFields, PostMeta, SearchResult};
use crate::services::PostRepository;

pub const TITLE_WEIGHT: u32 = 10;
pub const SUMMARY_WEIGHT: u32 = 5;
pub const TAGS_WEIGHT: u32 = 3;
pub const CONTENT_WEIGHT: u32 = 1;

/// Service for handling search operations
pub struct SearchService {
    repository: PostRepository,
}

impl SearchService {
    /// Create a new search service
    pub fn new(repository: PostRepository) -> Self {
        Self { repository }
    }

    /// Score every post against `query`, best matches first
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>, BlogError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            debug!("Empty search query received");
            return Err(BlogError::EmptyQuery);
        }

        info!("Starting search for query: '{}'", query);
        let start_time = std::time::Instant::now();

        let mut results: Vec<SearchResult> = self
            .repository
            .list_all_posts()
            .into_iter()
            .filter_map(|post| self.score_post(post, &query))
            .collect();

        // Stable: equal scores keep the newest-first listing order.
        results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

        info!(
            "Search completed in {:?}ms, found {} results",
            start_time.elapsed().as_millis(),
            results.len()
        );
        Ok(results)
    }

    fn score_post(&self, post: PostMeta, query: &str) -> Option<SearchResult> {
        let mut matched = MatchedFields::default();
        let mut score = 0;

        if post.title.to_lowercase().contains(query) {
            matched.title = true;
            score += TITLE_WEIGHT;
        }
        if post.summary.as_ref().is_some_and(|s| s.to_lowercase().contains(query)) {
            matched.summary = true;
            score += SUMMARY_WEIGHT;
        }
        if post.tags.iter().any(|tag| tag.to_lowercase().contains(query)) {
            matched.tags = true;
            score += TAGS_WEIGHT;
        }
        match self.repository.get_post(&post.category, &post.slug) {
            Ok(full) => {
                if full.body.to_lowercase().contains(query) {
                    matched.content = true;
                    score += CONTENT_WEIGHT;
                }
            }
            Err(e) => warn!("Could not read content for {}: {}", post.full_path, e),
        }

        if score == 0 {
            return None;
        }
        debug!("Found match in {} with relevance: {}", post.full_path, score);
        Some(SearchResult {
            post,
            matched_fields: matched,
            relevance_score: score,
        })
    }
}
