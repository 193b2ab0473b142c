/// Moderation endpoints, admin role only
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AdminUser;
use crate::pagination::{PageRequest, PageUrl};
use crate::services::reports::{ReviewReportRequest, REPORTS_PER_PAGE};
use crate::services::ReportService;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQueueQuery {
    /// pending (default), reviewed or resolved
    pub status: Option<String>,
    pub page: Option<String>,
}

/// GET /api/v1/admin/reports
#[utoipa::path(
    get,
    path = "/api/v1/admin/reports",
    params(ReportQueueQuery),
    responses(
        (status = 200, description = "Reports with the requested status, oldest first"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn list_reports(
    admin: AdminUser,
    req: HttpRequest,
    query: web::Query<ReportQueueQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse> {
    let status = ReportService::status_filter(query.status.as_deref())?;
    let request = PageRequest::from_param(query.page.as_deref(), REPORTS_PER_PAGE);
    let url = PageUrl::from_request(&req);

    tracing::debug!(admin_id = %admin.0.id, status = %status, page = request.page(), "Listing reports");
    let page = reports.queue(status, request, &url).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// PATCH /api/v1/admin/reports/{report_id}
#[utoipa::path(
    patch,
    path = "/api/v1/admin/reports/{report_id}",
    params(("report_id" = Uuid, Path, description = "Report to review")),
    request_body = ReviewReportRequest,
    responses(
        (status = 200, description = "Report updated", body = crate::models::PostReport),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed"),
        (status = 422, description = "Missing or unknown status")
    )
)]
pub async fn review_report(
    admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<ReviewReportRequest>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse> {
    let next = ReportService::review_target(body.status.as_deref())?;
    let report = reports.review(path.into_inner(), next, admin.0.id).await?;
    Ok(HttpResponse::Ok().json(report))
}
