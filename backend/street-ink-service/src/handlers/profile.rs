use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use utoipa::ToSchema;

use crate::config::UploadConfig;
use crate::error::Result;
use crate::middleware::UserId;
use crate::multipart::read_form;
use crate::services::profile::ProfileInput;
use crate::services::ProfileService;

/// Multipart body of `PUT /api/v1/profile`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UpdateProfileForm {
    name: String,
    username: String,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    instagram: Option<String>,
    tiktok: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    avatar: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    cover_photo: Option<Vec<u8>>,
}

/// GET /api/v1/profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Own profile with posts", body = crate::services::profile::ProfileView),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(user: UserId, profile: web::Data<ProfileService>) -> Result<HttpResponse> {
    let view = profile.profile(user.0).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// PUT /api/v1/profile (multipart)
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body(content = UpdateProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = crate::services::profile::ProfileUpdated),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Invalid profile fields or image")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    user: UserId,
    payload: Multipart,
    uploads: web::Data<UploadConfig>,
    profile: web::Data<ProfileService>,
) -> Result<HttpResponse> {
    let mut form = read_form(
        payload,
        &[
            ("avatar", uploads.avatar_max_bytes),
            ("cover_photo", uploads.cover_max_bytes),
        ],
    )
    .await?;

    let input = ProfileInput {
        name: form.text("name"),
        username: form.text("username"),
        bio: form.text("bio"),
        location: form.text("location"),
        website: form.text("website"),
        instagram: form.text("instagram"),
        tiktok: form.text("tiktok"),
        avatar: form.file("avatar"),
        cover_photo: form.file("cover_photo"),
    };

    let updated = profile.update(user.0, input).await?;
    Ok(HttpResponse::Ok().json(updated))
}
