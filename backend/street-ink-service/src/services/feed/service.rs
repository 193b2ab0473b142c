use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{merge_page, project, FeedItem, FeedSource};
use crate::config::FeedConfig;
use crate::error::Result;
use crate::metrics::feed::{
    FEED_ITEMS_SERVED_TOTAL, FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL, FEED_WINDOW_ROWS,
};
use crate::models::Tag;
use crate::pagination::{PageRequest, PageUrl, Paginated};
use crate::storage::MediaStorage;

/// Everything the feed screen needs in one response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedPage {
    #[schema(value_type = Object)]
    pub posts: Paginated<FeedItem>,
    pub tags: Vec<Tag>,
    pub trending_tags: Vec<Tag>,
    /// Posts authored by the viewer; 0 for anonymous viewers
    pub artworks_count: i64,
}

#[derive(Clone)]
pub struct FeedService {
    source: Arc<dyn FeedSource>,
    media: Arc<dyn MediaStorage>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(source: Arc<dyn FeedSource>, media: Arc<dyn MediaStorage>, config: FeedConfig) -> Self {
        Self {
            source,
            media,
            config,
        }
    }

    /// Resolve a raw `page` query value against the configured page size.
    pub fn page_request(&self, raw_page: Option<&str>) -> PageRequest {
        PageRequest::from_param(raw_page, self.config.page_size)
    }

    /// Build one feed page for `viewer`.
    pub async fn page(
        &self,
        viewer: Option<Uuid>,
        request: PageRequest,
        url: &PageUrl,
    ) -> Result<FeedPage> {
        let start = Instant::now();
        let result = self.assemble(viewer, request, url).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };

        FEED_REQUEST_TOTAL.with_label_values(&[outcome]).inc();
        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        if let Err(err) = &result {
            error!(page = request.page(), "Failed to build feed page: {}", err);
        }
        result
    }

    async fn assemble(
        &self,
        viewer: Option<Uuid>,
        request: PageRequest,
        url: &PageUrl,
    ) -> Result<FeedPage> {
        let (post_total, share_total) =
            tokio::try_join!(self.source.count_posts(), self.source.count_shares())?;
        let total = (post_total.max(0) + share_total.max(0)) as u64;

        let items = if request.offset() >= total {
            debug!(page = request.page(), total, "Feed page past the end");
            Vec::new()
        } else {
            self.items(request).await?
        };

        for item in &items {
            let kind = if item.is_shared() { "shared" } else { "original" };
            FEED_ITEMS_SERVED_TOTAL.with_label_values(&[kind]).inc();
        }

        let artworks_count = async {
            match viewer {
                Some(user_id) => self.source.count_posts_by_user(user_id).await,
                None => Ok(0),
            }
        };
        let (tags, trending_tags, artworks_count) = tokio::try_join!(
            self.source.all_tags(),
            self.source.trending_tags(self.config.trending_tag_limit),
            artworks_count,
        )?;

        debug!(
            page = request.page(),
            total,
            items = items.len(),
            viewer = ?viewer,
            "Feed page assembled"
        );

        Ok(FeedPage {
            posts: Paginated::new(items, request, total, url),
            tags,
            trending_tags,
            artworks_count,
        })
    }

    async fn items(&self, request: PageRequest) -> Result<Vec<FeedItem>> {
        let window = i64::try_from(request.window()).unwrap_or(i64::MAX);
        let (posts, shares) = tokio::try_join!(
            self.source.latest_posts(window),
            self.source.latest_shares(window)
        )?;
        FEED_WINDOW_ROWS.observe((posts.len() + shares.len()) as f64);

        let entries = merge_page(posts, shares, &request);
        let details = self
            .source
            .load_details(&entries, self.config.comment_preview_limit)
            .await?;

        let media = self.media.clone();
        Ok(project(entries, &details, &|path| media.public_url(path)))
    }
}
