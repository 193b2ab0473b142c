use crate::models::{EngagementTarget, TargetKind};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct LikeCountRow {
    post_id: Option<Uuid>,
    shared_post_id: Option<Uuid>,
    likes: i64,
}

/// Insert a like unless the user already likes the target.
/// Returns whether a row was written.
pub async fn like(pool: &PgPool, user_id: Uuid, target: EngagementTarget) -> Result<bool, sqlx::Error> {
    let column = target.kind.column();
    let sql = format!(
        "INSERT INTO likes (user_id, {col}) VALUES ($1, $2) \
         ON CONFLICT (user_id, {col}) WHERE {col} IS NOT NULL DO NOTHING",
        col = column
    );
    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(target.id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns whether a row was removed.
pub async fn unlike(pool: &PgPool, user_id: Uuid, target: EngagementTarget) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "DELETE FROM likes WHERE user_id = $1 AND {} = $2",
        target.kind.column()
    );
    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(target.id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_likes(pool: &PgPool, target: EngagementTarget) -> Result<i64, sqlx::Error> {
    let sql = format!(
        "SELECT COUNT(*) AS count FROM likes WHERE {} = $1",
        target.kind.column()
    );
    let row = sqlx::query(&sql).bind(target.id).fetch_one(pool).await?;
    Ok(row.get::<i64, _>("count"))
}

/// Like counts for a batch of targets. Targets without likes are absent.
pub async fn like_counts(
    pool: &PgPool,
    post_ids: &[Uuid],
    shared_post_ids: &[Uuid],
) -> Result<HashMap<EngagementTarget, i64>, sqlx::Error> {
    if post_ids.is_empty() && shared_post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, LikeCountRow>(
        r#"
        SELECT post_id, shared_post_id, COUNT(*) AS likes
        FROM likes
        WHERE post_id = ANY($1) OR shared_post_id = ANY($2)
        GROUP BY post_id, shared_post_id
        "#,
    )
    .bind(post_ids)
    .bind(shared_post_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let target = match (row.post_id, row.shared_post_id) {
                (Some(id), None) => EngagementTarget { kind: TargetKind::Post, id },
                (None, Some(id)) => EngagementTarget { kind: TargetKind::SharedPost, id },
                _ => return None,
            };
            Some((target, row.likes))
        })
        .collect())
}
