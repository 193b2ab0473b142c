/// Like, unlike and comment on posts and shared posts
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::EngagementTarget;
use crate::services::engagement::CommentRequest;
use crate::services::EngagementService;

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/like",
    params(("post_id" = Uuid, Path, description = "Post")),
    responses(
        (status = 200, description = "Current like state", body = crate::services::engagement::LikeState),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_post(
    user: UserId,
    path: web::Path<Uuid>,
    engagement: web::Data<EngagementService>,
) -> Result<HttpResponse> {
    let state = engagement
        .like(user.0, EngagementTarget::post(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}/like",
    params(("post_id" = Uuid, Path, description = "Post")),
    responses(
        (status = 200, description = "Current like state", body = crate::services::engagement::LikeState),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unlike_post(
    user: UserId,
    path: web::Path<Uuid>,
    engagement: web::Data<EngagementService>,
) -> Result<HttpResponse> {
    let state = engagement
        .unlike(user.0, EngagementTarget::post(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    post,
    path = "/api/v1/shares/{share_id}/like",
    params(("share_id" = Uuid, Path, description = "Shared post")),
    responses(
        (status = 200, description = "Current like state", body = crate::services::engagement::LikeState),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Shared post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_share(
    user: UserId,
    path: web::Path<Uuid>,
    engagement: web::Data<EngagementService>,
) -> Result<HttpResponse> {
    let state = engagement
        .like(user.0, EngagementTarget::shared_post(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shares/{share_id}/like",
    params(("share_id" = Uuid, Path, description = "Shared post")),
    responses(
        (status = 200, description = "Current like state", body = crate::services::engagement::LikeState),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Shared post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unlike_share(
    user: UserId,
    path: web::Path<Uuid>,
    engagement: web::Data<EngagementService>,
) -> Result<HttpResponse> {
    let state = engagement
        .unlike(user.0, EngagementTarget::shared_post(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments",
    params(("post_id" = Uuid, Path, description = "Post")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment with its author", body = crate::models::CommentView),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Invalid comment body")
    ),
    security(("bearer_auth" = []))
)]
pub async fn comment_on_post(
    user: UserId,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
    engagement: web::Data<EngagementService>,
) -> Result<HttpResponse> {
    let comment = engagement
        .comment(user.0, EngagementTarget::post(path.into_inner()), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

#[utoipa::path(
    post,
    path = "/api/v1/shares/{share_id}/comments",
    params(("share_id" = Uuid, Path, description = "Shared post")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment with its author", body = crate::models::CommentView),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Shared post not found"),
        (status = 422, description = "Invalid comment body")
    ),
    security(("bearer_auth" = []))
)]
pub async fn comment_on_share(
    user: UserId,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
    engagement: web::Data<EngagementService>,
) -> Result<HttpResponse> {
    let comment = engagement
        .comment(
            user.0,
            EngagementTarget::shared_post(path.into_inner()),
            body.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Created().json(comment))
}
