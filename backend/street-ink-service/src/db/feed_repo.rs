use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use super::{comment_repo, like_repo, post_repo, share_repo, tag_repo, user_repo};
use crate::error::Result;
use crate::models::{Post, SharedPost, Tag};
use crate::services::feed::{FeedDetails, FeedEntry, FeedSource};

/// `FeedSource` over the Postgres schema
#[derive(Clone)]
pub struct PgFeedSource {
    pool: PgPool,
}

impl PgFeedSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedSource for PgFeedSource {
    async fn latest_posts(&self, limit: i64) -> Result<Vec<Post>> {
        Ok(post_repo::latest_posts(&self.pool, limit, 0).await?)
    }

    async fn latest_shares(&self, limit: i64) -> Result<Vec<SharedPost>> {
        Ok(share_repo::latest_shares(&self.pool, limit, 0).await?)
    }

    async fn count_posts(&self) -> Result<i64> {
        Ok(post_repo::count_posts(&self.pool).await?)
    }

    async fn count_shares(&self) -> Result<i64> {
        Ok(share_repo::count_shares(&self.pool).await?)
    }

    async fn load_details(&self, entries: &[FeedEntry], comment_limit: i64) -> Result<FeedDetails> {
        let mut page_post_ids = Vec::new();
        let mut page_share_ids = Vec::new();
        let mut referenced_post_ids = Vec::new();
        let mut user_ids = HashSet::new();

        for entry in entries {
            match entry {
                FeedEntry::Original(post) => {
                    page_post_ids.push(post.id);
                    user_ids.insert(post.user_id);
                }
                FeedEntry::Shared(share) => {
                    page_share_ids.push(share.id);
                    referenced_post_ids.push(share.post_id);
                    user_ids.insert(share.user_id);
                }
            }
        }

        let shared_posts = post_repo::find_posts_by_ids(&self.pool, &referenced_post_ids).await?;
        user_ids.extend(shared_posts.iter().map(|post| post.user_id));

        let mut tagged_post_ids = page_post_ids.clone();
        tagged_post_ids.extend(shared_posts.iter().map(|post| post.id));
        let user_ids: Vec<Uuid> = user_ids.into_iter().collect();

        let (users, tags, like_counts, comments) = tokio::try_join!(
            user_repo::summaries_by_ids(&self.pool, &user_ids),
            tag_repo::tags_for_posts(&self.pool, &tagged_post_ids),
            like_repo::like_counts(&self.pool, &page_post_ids, &page_share_ids),
            comment_repo::comment_previews(&self.pool, &page_post_ids, &page_share_ids, comment_limit),
        )?;

        Ok(FeedDetails {
            users,
            shared_posts: shared_posts.into_iter().map(|post| (post.id, post)).collect(),
            tags,
            like_counts,
            comments,
        })
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        Ok(tag_repo::all_tags(&self.pool).await?)
    }

    async fn trending_tags(&self, limit: i64) -> Result<Vec<Tag>> {
        Ok(tag_repo::trending_tags(&self.pool, limit).await?)
    }

    async fn count_posts_by_user(&self, user_id: Uuid) -> Result<i64> {
        Ok(post_repo::count_posts_by_user(&self.pool, user_id).await?)
    }
}
