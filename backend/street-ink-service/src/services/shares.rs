use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::{post_repo, share_repo};
use crate::error::{AppError, Result};
use crate::models::SharedPost;
use crate::validation::trimmed;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SharePostRequest {
    #[validate(length(max = 1000, message = "The caption may not be greater than 1000 characters."))]
    pub caption: Option<String>,
}

#[derive(Clone)]
pub struct ShareService {
    pool: PgPool,
}

impl ShareService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Re-share `post_id`. The same user may share a post more than once.
    pub async fn share(&self, user_id: Uuid, post_id: Uuid, request: SharePostRequest) -> Result<SharedPost> {
        let request = SharePostRequest {
            caption: trimmed(request.caption),
        };
        request.validate()?;

        if !post_repo::post_exists(&self.pool, post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let share = share_repo::create_share(&self.pool, user_id, post_id, request.caption.as_deref())
            .await
            .map_err(|err| match AppError::from(err) {
                AppError::NotFound(_) => AppError::NotFound("Post not found".to_string()),
                other => other,
            })?;

        info!(share_id = %share.id, post_id = %post_id, user_id = %user_id, "Post shared");
        Ok(share)
    }
}
