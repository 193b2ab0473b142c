use crate::models::Tag;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: Uuid,
    id: Uuid,
    name: String,
    usage_count: i64,
}

pub async fn all_tags(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name, usage_count FROM tags ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn trending_tags(pool: &PgPool, limit: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        "SELECT id, name, usage_count FROM tags ORDER BY usage_count DESC, name LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Which of `ids` exist.
pub async fn existing_tag_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM tags WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Tags per post, alphabetical within each post.
pub async fn tags_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Tag>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, PostTagRow>(
        r#"
        SELECT pt.post_id, t.id, t.name, t.usage_count
        FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        by_post.entry(row.post_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            usage_count: row.usage_count,
        });
    }
    Ok(by_post)
}

/// Link tags to a post and increment their usage counts.
pub async fn attach_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        SELECT $1, UNNEST($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tag_ids)
    .execute(&mut **tx)
    .await?;

    sqlx::query_as::<_, Tag>(
        r#"
        UPDATE tags SET usage_count = usage_count + 1
        WHERE id = ANY($1)
        RETURNING id, name, usage_count
        "#,
    )
    .bind(tag_ids)
    .fetch_all(&mut **tx)
    .await
}
