use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::Result;
use crate::models::User;
use crate::pagination::{PageRequest, PageUrl, Paginated};
use crate::storage::MediaStorage;

pub const ARTISTS_PER_PAGE: u32 = 12;

/// Directory card for an artist
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ArtistCard {
    pub id: Uuid,
    pub name: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl ArtistCard {
    fn new(user: User, media: &dyn MediaStorage) -> Self {
        Self {
            id: user.id,
            avatar_url: user.avatar.as_deref().map(|p| media.public_url(p)),
            name: user.name,
            username: user.username,
            bio: user.bio,
            location: user.location,
        }
    }
}

#[derive(Clone)]
pub struct ArtistService {
    pool: PgPool,
    media: Arc<dyn MediaStorage>,
}

impl ArtistService {
    pub fn new(pool: PgPool, media: Arc<dyn MediaStorage>) -> Self {
        Self { pool, media }
    }

    /// Every non-admin account, paginated.
    pub async fn directory(&self, request: PageRequest, url: &PageUrl) -> Result<Paginated<ArtistCard>> {
        let total = user_repo::count_artists(&self.pool).await?.max(0) as u64;
        let cards = if request.offset() >= total {
            Vec::new()
        } else {
            let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
            user_repo::list_artists(&self.pool, i64::from(request.per_page()), offset)
                .await?
                .into_iter()
                .map(|user| ArtistCard::new(user, self.media.as_ref()))
                .collect()
        };
        Ok(Paginated::new(cards, request, total, url))
    }
}
