/// Likes and comments on posts and shared posts
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::{comment_repo, like_repo, post_repo, share_repo};
use crate::error::{AppError, Result};
use crate::models::{CommentView, EngagementTarget, TargetKind};
use crate::validation::trimmed;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(
        required(message = "The body field is required."),
        length(max = 1000, message = "The body may not be greater than 1000 characters.")
    )]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Clone)]
pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_target(&self, target: EngagementTarget) -> Result<()> {
        let exists = match target.kind {
            TargetKind::Post => post_repo::post_exists(&self.pool, target.id).await?,
            TargetKind::SharedPost => share_repo::share_exists(&self.pool, target.id).await?,
        };
        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} not found", target.kind.label())))
        }
    }

    /// Like `target`; liking twice is a no-op.
    pub async fn like(&self, user_id: Uuid, target: EngagementTarget) -> Result<LikeState> {
        self.ensure_target(target).await?;
        let inserted = like_repo::like(&self.pool, user_id, target).await?;
        debug!(user_id = %user_id, target_id = %target.id, inserted, "Like recorded");

        Ok(LikeState {
            liked: true,
            like_count: like_repo::count_likes(&self.pool, target).await?,
        })
    }

    pub async fn unlike(&self, user_id: Uuid, target: EngagementTarget) -> Result<LikeState> {
        self.ensure_target(target).await?;
        let removed = like_repo::unlike(&self.pool, user_id, target).await?;
        debug!(user_id = %user_id, target_id = %target.id, removed, "Like removed");

        Ok(LikeState {
            liked: false,
            like_count: like_repo::count_likes(&self.pool, target).await?,
        })
    }

    pub async fn comment(
        &self,
        user_id: Uuid,
        target: EngagementTarget,
        request: CommentRequest,
    ) -> Result<CommentView> {
        let request = CommentRequest {
            body: trimmed(request.body),
        };
        request.validate()?;
        self.ensure_target(target).await?;

        let body = request.body.unwrap_or_default();
        Ok(comment_repo::create_comment(&self.pool, user_id, target, &body).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_body_is_required_after_trim() {
        let request = CommentRequest {
            body: trimmed(Some("  ".to_string())),
        };
        assert!(request.validate().is_err());

        let request = CommentRequest {
            body: Some("fresh paint".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
