use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::Result;
use crate::pagination::{PageRequest, PageUrl};
use crate::services::artists::ARTISTS_PER_PAGE;
use crate::services::ArtistService;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ArtistQuery {
    pub page: Option<String>,
}

/// GET /api/v1/artists
#[utoipa::path(
    get,
    path = "/api/v1/artists",
    params(ArtistQuery),
    responses((status = 200, description = "Artist directory page"))
)]
pub async fn list_artists(
    req: HttpRequest,
    query: web::Query<ArtistQuery>,
    artists: web::Data<ArtistService>,
) -> Result<HttpResponse> {
    let request = PageRequest::from_param(query.page.as_deref(), ARTISTS_PER_PAGE);
    let url = PageUrl::from_request(&req);
    let page = artists.directory(request, &url).await?;
    Ok(HttpResponse::Ok().json(page))
}
