use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{FeedDetails, FeedEntry};
use crate::models::{CommentView, Post, Tag, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Location {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Renderable content of a post
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostContent {
    pub id: Uuid,
    pub author: UserSummary,
    pub caption: String,
    pub image_url: String,
    pub location: Option<Location>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
}

/// One timeline entry. `display_at` is the creation time of the selected
/// entity: the post for `original`, the share for `shared`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Original {
        id: Uuid,
        display_at: DateTime<Utc>,
        post: PostContent,
        like_count: i64,
        comments: Vec<CommentView>,
    },
    Shared {
        id: Uuid,
        display_at: DateTime<Utc>,
        sharer: UserSummary,
        caption: Option<String>,
        post: PostContent,
        like_count: i64,
        comments: Vec<CommentView>,
    },
}

impl FeedItem {
    pub fn id(&self) -> Uuid {
        match self {
            FeedItem::Original { id, .. } | FeedItem::Shared { id, .. } => *id,
        }
    }

    pub fn display_at(&self) -> DateTime<Utc> {
        match self {
            FeedItem::Original { display_at, .. } | FeedItem::Shared { display_at, .. } => {
                *display_at
            }
        }
    }

    pub fn post(&self) -> &PostContent {
        match self {
            FeedItem::Original { post, .. } | FeedItem::Shared { post, .. } => post,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, FeedItem::Shared { .. })
    }
}

fn content(post: &Post, details: &FeedDetails, public_url: &dyn Fn(&str) -> String) -> Option<PostContent> {
    let Some(author) = details.users.get(&post.user_id) else {
        warn!(post_id = %post.id, user_id = %post.user_id, "Post author missing from feed details");
        return None;
    };

    let location = (post.location_name.is_some() || post.has_coordinates()).then(|| Location {
        name: post.location_name.clone(),
        latitude: post.latitude,
        longitude: post.longitude,
    });

    Some(PostContent {
        id: post.id,
        author: author.clone(),
        caption: post.caption.clone(),
        image_url: public_url(&post.image_url),
        location,
        tags: details.tags.get(&post.id).cloned().unwrap_or_default(),
        created_at: post.created_at,
    })
}

/// Resolve page entries into feed items, keeping their order.
///
/// Entries whose relations vanished between the page query and the detail
/// load (a concurrent delete) are dropped with a warning.
pub fn project(
    entries: Vec<FeedEntry>,
    details: &FeedDetails,
    public_url: &dyn Fn(&str) -> String,
) -> Vec<FeedItem> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let target = entry.target();
            let like_count = details.like_counts.get(&target).copied().unwrap_or(0);
            let comments = details.comments.get(&target).cloned().unwrap_or_default();

            match entry {
                FeedEntry::Original(post) => Some(FeedItem::Original {
                    id: post.id,
                    display_at: post.created_at,
                    post: content(&post, details, public_url)?,
                    like_count,
                    comments,
                }),
                FeedEntry::Shared(share) => {
                    let Some(original) = details.shared_posts.get(&share.post_id) else {
                        warn!(share_id = %share.id, post_id = %share.post_id, "Shared post target missing");
                        return None;
                    };
                    let Some(sharer) = details.users.get(&share.user_id) else {
                        warn!(share_id = %share.id, user_id = %share.user_id, "Sharer missing from feed details");
                        return None;
                    };

                    Some(FeedItem::Shared {
                        id: share.id,
                        display_at: share.created_at,
                        sharer: sharer.clone(),
                        caption: share.caption,
                        post: content(original, details, public_url)?,
                        like_count,
                        comments,
                    })
                }
            }
        })
        .collect()
}
