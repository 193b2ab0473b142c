use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::reports::{ReportPostRequest, REPORT_ACCEPTED_MESSAGE};
use crate::services::ReportService;

/// POST /api/v1/posts/{post_id}/report
///
/// Accepts either a JSON or a urlencoded body.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/report",
    params(("post_id" = Uuid, Path, description = "Post to report")),
    request_body = ReportPostRequest,
    responses(
        (status = 201, description = "Report filed"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Already reported by this user"),
        (status = 422, description = "Invalid report fields")
    )
)]
pub async fn report_post(
    user: UserId,
    path: web::Path<Uuid>,
    body: web::Either<web::Json<ReportPostRequest>, web::Form<ReportPostRequest>>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse> {
    let request = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };

    let report = reports.submit(user.0, path.into_inner(), request).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": REPORT_ACCEPTED_MESSAGE,
        "report": report,
    })))
}
