use crate::models::{CommentView, EngagementTarget, TargetKind, UserSummary};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Option<Uuid>,
    shared_post_id: Option<Uuid>,
    body: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_name: String,
    author_username: Option<String>,
    author_avatar: Option<String>,
}

impl CommentRow {
    fn target(&self) -> Option<EngagementTarget> {
        match (self.post_id, self.shared_post_id) {
            (Some(id), None) => Some(EngagementTarget { kind: TargetKind::Post, id }),
            (None, Some(id)) => Some(EngagementTarget { kind: TargetKind::SharedPost, id }),
            _ => None,
        }
    }

    fn into_view(self) -> CommentView {
        CommentView {
            id: self.id,
            body: self.body,
            author: UserSummary {
                id: self.author_id,
                name: self.author_name,
                username: self.author_username,
                avatar: self.author_avatar,
            },
            created_at: self.created_at,
        }
    }
}

const COMMENT_SELECT: &str = r#"
    c.id, c.post_id, c.shared_post_id, c.body, c.created_at,
    u.id AS author_id, u.name AS author_name, u.username AS author_username, u.avatar AS author_avatar
"#;

/// Insert a comment and return it with its author.
pub async fn create_comment(
    pool: &PgPool,
    user_id: Uuid,
    target: EngagementTarget,
    body: &str,
) -> Result<CommentView, sqlx::Error> {
    let sql = format!(
        r#"
        WITH inserted AS (
            INSERT INTO comments (user_id, {col}, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, post_id, shared_post_id, body, created_at
        )
        SELECT {select}
        FROM inserted c
        JOIN users u ON u.id = c.user_id
        "#,
        col = target.kind.column(),
        select = COMMENT_SELECT
    );
    let row = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(user_id)
        .bind(target.id)
        .bind(body)
        .fetch_one(pool)
        .await?;
    Ok(row.into_view())
}

/// Newest `per_target` comments of each target, newest first.
pub async fn comment_previews(
    pool: &PgPool,
    post_ids: &[Uuid],
    shared_post_ids: &[Uuid],
    per_target: i64,
) -> Result<HashMap<EngagementTarget, Vec<CommentView>>, sqlx::Error> {
    if post_ids.is_empty() && shared_post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        r#"
        SELECT id, post_id, shared_post_id, body, created_at,
               author_id, author_name, author_username, author_avatar
        FROM (
            SELECT {select},
                   ROW_NUMBER() OVER (
                       PARTITION BY c.post_id, c.shared_post_id
                       ORDER BY c.created_at DESC, c.id DESC
                   ) AS position
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ANY($1) OR c.shared_post_id = ANY($2)
        ) ranked
        WHERE position <= $3
        ORDER BY created_at DESC, id DESC
        "#,
        select = COMMENT_SELECT
    );
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(post_ids)
        .bind(shared_post_ids)
        .bind(per_target)
        .fetch_all(pool)
        .await?;

    let mut by_target: HashMap<EngagementTarget, Vec<CommentView>> = HashMap::new();
    for row in rows {
        if let Some(target) = row.target() {
            by_target.entry(target).or_default().push(row.into_view());
        }
    }
    Ok(by_target)
}
