use crate::models::SharedPost;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const SHARE_COLUMNS: &str = "id, user_id, post_id, caption, created_at";

/// Newest shares first, ties broken by id.
pub async fn latest_shares(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<SharedPost>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM shared_posts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        SHARE_COLUMNS
    );
    sqlx::query_as::<_, SharedPost>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_shares(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM shared_posts")
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

pub async fn share_exists(pool: &PgPool, share_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM shared_posts WHERE id = $1) AS present")
        .bind(share_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<bool, _>("present"))
}

/// A foreign-key violation here means the post disappeared.
pub async fn create_share(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    caption: Option<&str>,
) -> Result<SharedPost, sqlx::Error> {
    let sql = format!(
        "INSERT INTO shared_posts (user_id, post_id, caption) VALUES ($1, $2, $3) RETURNING {}",
        SHARE_COLUMNS
    );
    sqlx::query_as::<_, SharedPost>(&sql)
        .bind(user_id)
        .bind(post_id)
        .bind(caption)
        .fetch_one(pool)
        .await
}
