use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::FeedEntry;
use crate::error::Result;
use crate::models::{CommentView, EngagementTarget, Post, SharedPost, Tag, UserSummary};

/// Relations for the entries of one page, keyed for lookup during projection
#[derive(Debug, Clone, Default)]
pub struct FeedDetails {
    /// Users referenced by the page: post authors and sharers
    pub users: HashMap<Uuid, UserSummary>,
    /// Underlying posts of the page's shares
    pub shared_posts: HashMap<Uuid, Post>,
    /// Tags per post id
    pub tags: HashMap<Uuid, Vec<Tag>>,
    pub like_counts: HashMap<EngagementTarget, i64>,
    /// Newest-first comments per target, capped at the preview limit
    pub comments: HashMap<EngagementTarget, Vec<CommentView>>,
}

/// Read side of the feed
///
/// Both listings return rows ordered `created_at DESC, id DESC`.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn latest_posts(&self, limit: i64) -> Result<Vec<Post>>;

    async fn latest_shares(&self, limit: i64) -> Result<Vec<SharedPost>>;

    async fn count_posts(&self) -> Result<i64>;

    async fn count_shares(&self) -> Result<i64>;

    /// Load everything needed to render `entries`.
    async fn load_details(&self, entries: &[FeedEntry], comment_limit: i64) -> Result<FeedDetails>;

    async fn all_tags(&self) -> Result<Vec<Tag>>;

    /// Tags ordered by usage count, highest first.
    async fn trending_tags(&self, limit: i64) -> Result<Vec<Tag>>;

    async fn count_posts_by_user(&self, user_id: Uuid) -> Result<i64>;
}
