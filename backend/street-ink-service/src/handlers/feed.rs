use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::Result;
use crate::middleware::UserId;
use crate::pagination::PageUrl;
use crate::services::FeedService;

#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedQuery {
    /// 1-based page; anything unparsable or below 1 means page 1
    pub page: Option<String>,
}

/// GET /api/v1/feed
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    params(FeedQuery),
    responses((status = 200, description = "Feed page", body = crate::services::feed::FeedPage))
)]
pub async fn get_feed(
    req: HttpRequest,
    query: web::Query<FeedQuery>,
    viewer: Option<UserId>,
    feed: web::Data<FeedService>,
) -> Result<HttpResponse> {
    let request = feed.page_request(query.page.as_deref());
    let url = PageUrl::from_request(&req);

    let page = feed.page(viewer.map(|v| v.0), request, &url).await?;
    Ok(HttpResponse::Ok().json(page))
}
