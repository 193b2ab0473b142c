/// Post handlers - creation, single reads, sharing and map markers
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::Result;
use crate::middleware::UserId;
use crate::multipart::read_form;
use crate::pagination::PageRequest;
use crate::services::posts::CreatePostInput;
use crate::services::shares::SharePostRequest;
use crate::services::{PostService, ShareService};

/// Posts per map page, matching the latest-posts listing
pub const MAP_PAGE_SIZE: u32 = 10;

/// Multipart body of `POST /api/v1/posts`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreatePostForm {
    caption: String,
    /// Existing tag ids; also accepted as `tags[]`
    tags: Option<Vec<Uuid>>,
    #[schema(value_type = String, format = Binary)]
    image_url: Vec<u8>,
    location_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// POST /api/v1/posts (multipart)
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body(content = CreatePostForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created"),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Not signed in"),
        (status = 422, description = "Invalid post fields or image")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    user: UserId,
    payload: Multipart,
    uploads: web::Data<UploadConfig>,
    posts: web::Data<PostService>,
) -> Result<HttpResponse> {
    let mut form = read_form(payload, &[("image_url", uploads.post_image_max_bytes)]).await?;
    let input = CreatePostInput {
        caption: form.text("caption"),
        tags: form.texts("tags"),
        location_name: form.text("location_name"),
        latitude: form.text("latitude"),
        longitude: form.text("longitude"),
        image: form.file("image_url"),
    };

    let post = posts.create_post(user.0, input).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Your post was successfully created!",
        "post": post,
    })))
}

/// GET /api/v1/posts/{post_id}
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with tags", body = crate::services::posts::PostView),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(path: web::Path<Uuid>, posts: web::Data<PostService>) -> Result<HttpResponse> {
    let post = posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/v1/posts/{post_id}/share
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/share",
    params(("post_id" = Uuid, Path, description = "Post to share")),
    request_body(content = Option<SharePostRequest>, description = "Optional caption"),
    responses(
        (status = 201, description = "Post shared"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Caption too long")
    ),
    security(("bearer_auth" = []))
)]
pub async fn share_post(
    user: UserId,
    path: web::Path<Uuid>,
    body: Option<web::Json<SharePostRequest>>,
    shares: web::Data<ShareService>,
) -> Result<HttpResponse> {
    let request = body.map(|b| b.into_inner()).unwrap_or_default();
    let share = shares.share(user.0, path.into_inner(), request).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Post shared successfully.",
        "shared_post": share,
    })))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MapQuery {
    pub page: Option<String>,
}

/// GET /api/v1/map/posts
#[utoipa::path(
    get,
    path = "/api/v1/map/posts",
    params(MapQuery),
    responses((status = 200, description = "Markers for geolocated posts", body = [crate::services::posts::MapMarker]))
)]
pub async fn map_posts(query: web::Query<MapQuery>, posts: web::Data<PostService>) -> Result<HttpResponse> {
    let request = PageRequest::from_param(query.page.as_deref(), MAP_PAGE_SIZE);
    let markers = posts.map_markers(request).await?;
    Ok(HttpResponse::Ok().json(markers))
}
