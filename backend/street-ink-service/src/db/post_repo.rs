use crate::models::{NewPost, Post, Tag};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::tag_repo;

const POST_COLUMNS: &str =
    "id, user_id, caption, image_url, location_name, latitude, longitude, created_at";

/// Newest posts first, ties broken by id.
pub async fn latest_posts(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_posts_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Post>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT {} FROM posts WHERE id = ANY($1)", POST_COLUMNS);
    sqlx::query_as::<_, Post>(&sql).bind(ids).fetch_all(pool).await
}

/// All posts by a user, newest first.
pub async fn find_posts_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM posts WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn count_posts_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

pub async fn post_exists(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1) AS present")
        .bind(post_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<bool, _>("present"))
}

async fn insert_post(tx: &mut Transaction<'_, Postgres>, new_post: &NewPost) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO posts (user_id, caption, image_url, location_name, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(new_post.user_id)
        .bind(&new_post.caption)
        .bind(&new_post.image_url)
        .bind(new_post.location_name.as_deref())
        .bind(new_post.latitude)
        .bind(new_post.longitude)
        .fetch_one(&mut **tx)
        .await
}

/// Insert a post, link its tags and bump each tag's usage count atomically.
pub async fn create_post_with_tags(
    pool: &PgPool,
    new_post: &NewPost,
    tag_ids: &[Uuid],
) -> Result<(Post, Vec<Tag>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let post = insert_post(&mut tx, new_post).await?;
    let tags = if tag_ids.is_empty() {
        Vec::new()
    } else {
        tag_repo::attach_tags(&mut tx, post.id, tag_ids).await?
    };

    tx.commit().await?;
    Ok((post, tags))
}
