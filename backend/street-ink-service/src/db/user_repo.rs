use crate::models::{User, UserSummary};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, username, email, avatar, cover_photo, bio, location, \
     website, instagram, tiktok, role, created_at, updated_at";

/// Profile fields written by a profile update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    /// `Some` replaces the stored path; `None` keeps it
    pub avatar: Option<String>,
    pub cover_photo: Option<String>,
}

pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn summaries_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, UserSummary>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, username, avatar FROM users WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

/// Whether another account already holds `username`.
pub async fn username_taken(
    pool: &PgPool,
    username: &str,
    except_user: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2) AS taken",
    )
    .bind(username)
    .bind(except_user)
    .fetch_one(pool)
    .await?;
    Ok(row.get::<bool, _>("taken"))
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    changes: &ProfileChanges,
) -> Result<User, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE users SET
            name = $2,
            username = $3,
            bio = $4,
            location = $5,
            website = $6,
            instagram = $7,
            tiktok = $8,
            avatar = COALESCE($9, avatar),
            cover_photo = COALESCE($10, cover_photo),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(&changes.name)
        .bind(&changes.username)
        .bind(changes.bio.as_deref())
        .bind(changes.location.as_deref())
        .bind(changes.website.as_deref())
        .bind(changes.instagram.as_deref())
        .bind(changes.tiktok.as_deref())
        .bind(changes.avatar.as_deref())
        .bind(changes.cover_photo.as_deref())
        .fetch_one(pool)
        .await
}

/// Null out an image column whose object no longer exists.
pub async fn clear_image(pool: &PgPool, user_id: Uuid, column: &'static str) -> Result<(), sqlx::Error> {
    let sql = format!(
        "UPDATE users SET {} = NULL, updated_at = NOW() WHERE id = $1",
        column
    );
    sqlx::query(&sql).bind(user_id).execute(pool).await?;
    Ok(())
}

/// Non-admin accounts, newest first.
pub async fn list_artists(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE role <> 'admin' ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_artists(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE role <> 'admin'")
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}
