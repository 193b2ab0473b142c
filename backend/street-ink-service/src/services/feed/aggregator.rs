use chrono::{DateTime, Utc};

use crate::models::{EngagementTarget, Post, SharedPost};
use crate::pagination::PageRequest;

/// A timeline candidate before its relations are attached
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEntry {
    Original(Post),
    Shared(SharedPost),
}

impl FeedEntry {
    /// Creation time of the entity itself. For a share this is when it was
    /// shared, not when the underlying post was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            FeedEntry::Original(post) => post.created_at,
            FeedEntry::Shared(share) => share.created_at,
        }
    }

    /// Where this entry's likes and comments live.
    pub fn target(&self) -> EngagementTarget {
        match self {
            FeedEntry::Original(post) => EngagementTarget::post(post.id),
            FeedEntry::Shared(share) => EngagementTarget::shared_post(share.id),
        }
    }
}

/// Merge both sources into one newest-first sequence and cut out `request`'s page.
///
/// Each input must hold either its whole source or at least the leading
/// `request.window()` rows of it, in load order. The sort is stable, so equal
/// timestamps keep load order with original posts ahead of shares.
pub fn merge_page(
    posts: Vec<Post>,
    shares: Vec<SharedPost>,
    request: &PageRequest,
) -> Vec<FeedEntry> {
    let mut entries: Vec<FeedEntry> = posts
        .into_iter()
        .map(FeedEntry::Original)
        .chain(shares.into_iter().map(FeedEntry::Shared))
        .collect();

    entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    entries
        .into_iter()
        .skip(offset)
        .take(request.per_page() as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn post(minutes: i64) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            caption: format!("wall at +{}m", minutes),
            image_url: "posts/wall.jpg".to_string(),
            location_name: None,
            latitude: None,
            longitude: None,
            created_at: at(minutes),
        }
    }

    fn share(minutes: i64, of: &Post) -> SharedPost {
        SharedPost {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            post_id: of.id,
            caption: None,
            created_at: at(minutes),
        }
    }

    #[test]
    fn shares_sort_by_their_own_timestamp() {
        let old_post = post(0);
        let newer_post = post(10);
        // Shared long after the post it points at.
        let late_share = share(20, &old_post);

        let page = merge_page(
            vec![newer_post.clone(), old_post.clone()],
            vec![late_share.clone()],
            &PageRequest::new(1, 10),
        );

        assert_eq!(
            page,
            vec![
                FeedEntry::Shared(late_share),
                FeedEntry::Original(newer_post),
                FeedEntry::Original(old_post),
            ]
        );
    }

    #[test]
    fn equal_timestamps_keep_posts_before_shares_in_load_order() {
        let first = post(5);
        let second = post(5);
        let tied_share = share(5, &first);

        let page = merge_page(
            vec![first.clone(), second.clone()],
            vec![tied_share.clone()],
            &PageRequest::new(1, 10),
        );

        assert_eq!(
            page,
            vec![
                FeedEntry::Original(first),
                FeedEntry::Original(second),
                FeedEntry::Shared(tied_share),
            ]
        );
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let posts = vec![post(1), post(2)];
        assert!(merge_page(posts, Vec::new(), &PageRequest::new(2, 10)).is_empty());
    }

    #[test]
    fn entry_target_follows_variant() {
        let original = post(0);
        let shared = share(1, &original);

        assert_eq!(
            FeedEntry::Original(original.clone()).target(),
            EngagementTarget::post(original.id)
        );
        assert_eq!(
            FeedEntry::Shared(shared.clone()).target(),
            EngagementTarget::shared_post(shared.id)
        );
    }
}
