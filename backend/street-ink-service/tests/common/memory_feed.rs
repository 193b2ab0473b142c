use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use street_ink_service::error::Result;
use street_ink_service::models::{
    CommentView, EngagementTarget, Post, SharedPost, Tag, UserSummary,
};
use street_ink_service::services::feed::{FeedDetails, FeedEntry, FeedSource};

#[derive(Default)]
struct Data {
    users: HashMap<Uuid, UserSummary>,
    posts: Vec<Post>,
    shares: Vec<SharedPost>,
    tags: Vec<Tag>,
    post_tags: HashMap<Uuid, Vec<Tag>>,
    likes: HashMap<EngagementTarget, i64>,
    comments: HashMap<EngagementTarget, Vec<CommentView>>,
}

/// `FeedSource` over in-process vectors, recording how it was queried
#[derive(Default)]
pub struct MemoryFeedSource {
    data: Mutex<Data>,
    window_fetches: Mutex<Vec<i64>>,
    detail_loads: Mutex<Vec<usize>>,
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl MemoryFeedSource {
    pub fn add_user(&self, name: &str) -> UserSummary {
        let user = UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            username: Some(name.to_lowercase().replace(' ', "_")),
            avatar: None,
        };
        self.data.lock().unwrap().users.insert(user.id, user.clone());
        user
    }

    pub fn add_post(&self, author: &UserSummary, created_at: DateTime<Utc>) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: author.id,
            caption: format!("piece by {} at {}", author.name, created_at.format("%H:%M")),
            image_url: format!("posts/{}.jpg", Uuid::new_v4()),
            location_name: None,
            latitude: None,
            longitude: None,
            created_at,
        };
        self.data.lock().unwrap().posts.push(post.clone());
        post
    }

    pub fn add_share(&self, sharer: &UserSummary, post: &Post, created_at: DateTime<Utc>) -> SharedPost {
        let share = SharedPost {
            id: Uuid::new_v4(),
            user_id: sharer.id,
            post_id: post.id,
            caption: Some(format!("{} shared this", sharer.name)),
            created_at,
        };
        self.data.lock().unwrap().shares.push(share.clone());
        share
    }

    pub fn add_tag(&self, name: &str, usage_count: i64) -> Tag {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            usage_count,
        };
        self.data.lock().unwrap().tags.push(tag.clone());
        tag
    }

    pub fn tag_post(&self, post: &Post, tag: &Tag) {
        self.data
            .lock()
            .unwrap()
            .post_tags
            .entry(post.id)
            .or_default()
            .push(tag.clone());
    }

    pub fn set_likes(&self, target: EngagementTarget, count: i64) {
        self.data.lock().unwrap().likes.insert(target, count);
    }

    pub fn add_comment(&self, target: EngagementTarget, author: &UserSummary, body: &str, created_at: DateTime<Utc>) {
        self.data
            .lock()
            .unwrap()
            .comments
            .entry(target)
            .or_default()
            .push(CommentView {
                id: Uuid::new_v4(),
                body: body.to_string(),
                author: author.clone(),
                created_at,
            });
    }

    /// Window sizes requested from `latest_posts`.
    pub fn window_fetches(&self) -> Vec<i64> {
        self.window_fetches.lock().unwrap().clone()
    }

    /// Entry counts passed to `load_details`.
    pub fn detail_loads(&self) -> Vec<usize> {
        self.detail_loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for MemoryFeedSource {
    async fn latest_posts(&self, limit: i64) -> Result<Vec<Post>> {
        self.window_fetches.lock().unwrap().push(limit);
        let mut posts = self.data.lock().unwrap().posts.clone();
        newest_first(&mut posts, |p| (p.created_at, p.id));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn latest_shares(&self, limit: i64) -> Result<Vec<SharedPost>> {
        let mut shares = self.data.lock().unwrap().shares.clone();
        newest_first(&mut shares, |s| (s.created_at, s.id));
        shares.truncate(limit as usize);
        Ok(shares)
    }

    async fn count_posts(&self) -> Result<i64> {
        Ok(self.data.lock().unwrap().posts.len() as i64)
    }

    async fn count_shares(&self) -> Result<i64> {
        Ok(self.data.lock().unwrap().shares.len() as i64)
    }

    async fn load_details(&self, entries: &[FeedEntry], comment_limit: i64) -> Result<FeedDetails> {
        self.detail_loads.lock().unwrap().push(entries.len());
        let data = self.data.lock().unwrap();
        let mut details = FeedDetails::default();

        let add_post = |post: &Post, details: &mut FeedDetails| {
            if let Some(author) = data.users.get(&post.user_id) {
                details.users.insert(author.id, author.clone());
            }
            if let Some(tags) = data.post_tags.get(&post.id) {
                details.tags.insert(post.id, tags.clone());
            }
        };

        for entry in entries {
            match entry {
                FeedEntry::Original(post) => add_post(post, &mut details),
                FeedEntry::Shared(share) => {
                    if let Some(sharer) = data.users.get(&share.user_id) {
                        details.users.insert(sharer.id, sharer.clone());
                    }
                    if let Some(original) = data.posts.iter().find(|p| p.id == share.post_id) {
                        add_post(original, &mut details);
                        details.shared_posts.insert(original.id, original.clone());
                    }
                }
            }

            let target = entry.target();
            if let Some(count) = data.likes.get(&target) {
                details.like_counts.insert(target, *count);
            }
            if let Some(comments) = data.comments.get(&target) {
                let mut comments = comments.clone();
                comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                comments.truncate(comment_limit as usize);
                details.comments.insert(target, comments);
            }
        }

        Ok(details)
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        let mut tags = self.data.lock().unwrap().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn trending_tags(&self, limit: i64) -> Result<Vec<Tag>> {
        let mut tags = self.data.lock().unwrap().tags.clone();
        tags.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.name.cmp(&b.name)));
        tags.truncate(limit as usize);
        Ok(tags)
    }

    async fn count_posts_by_user(&self, user_id: Uuid) -> Result<i64> {
        let data = self.data.lock().unwrap();
        Ok(data.posts.iter().filter(|p| p.user_id == user_id).count() as i64)
    }
}
