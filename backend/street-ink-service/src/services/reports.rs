/// Post reporting and the moderation queue
///
/// A user may report a given post once. The (post, user) uniqueness lives in
/// the database, so concurrent duplicates are caught by the same path as
/// sequential ones and surface as `AppError::Conflict`.
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::metrics::reports::{REPORT_REVIEWS_TOTAL, REPORT_SUBMISSIONS_TOTAL};
use crate::models::{NewReport, PostReport, ReportStatus};
use crate::pagination::{PageRequest, PageUrl, Paginated};
use crate::validation::trimmed;

/// Moderation queue page size
pub const REPORTS_PER_PAGE: u32 = 20;

pub const REPORT_ACCEPTED_MESSAGE: &str = "Thank you for your report. We will review it shortly.";

/// Persistence for reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn post_exists(&self, post_id: Uuid) -> Result<bool>;

    /// Insert a pending report. A second report by the same user on the same
    /// post fails with `AppError::Conflict`.
    async fn insert(&self, report: NewReport) -> Result<PostReport>;

    /// Reports with `status`, oldest first.
    async fn list(&self, status: ReportStatus, limit: i64, offset: i64) -> Result<Vec<PostReport>>;

    async fn count(&self, status: ReportStatus) -> Result<i64>;

    async fn find(&self, report_id: Uuid) -> Result<Option<PostReport>>;

    /// Move a report from `from` to `to`. Returns `None` when the report is no
    /// longer in `from`.
    async fn update_status(
        &self,
        report_id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
        reviewer: Uuid,
    ) -> Result<Option<PostReport>>;
}

/// Report form body
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ReportPostRequest {
    #[validate(
        required(message = "The report reason field is required."),
        length(max = 255, message = "The report reason may not be greater than 255 characters.")
    )]
    pub report_reason: Option<String>,

    #[validate(length(
        max = 1000,
        message = "The additional info may not be greater than 1000 characters."
    ))]
    pub additional_info: Option<String>,
}

impl ReportPostRequest {
    pub fn normalized(self) -> Self {
        Self {
            report_reason: trimmed(self.report_reason),
            additional_info: trimmed(self.additional_info),
        }
    }
}

/// Moderation decision body; `status` is checked by `ReportService::review_target`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewReportRequest {
    /// reviewed or resolved
    #[schema(example = "reviewed")]
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// File a report by `user_id` against `post_id`.
    pub async fn submit(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        request: ReportPostRequest,
    ) -> Result<PostReport> {
        let request = request.normalized();
        if let Err(errors) = request.validate() {
            REPORT_SUBMISSIONS_TOTAL.with_label_values(&["invalid"]).inc();
            return Err(errors.into());
        }

        if !self.store.post_exists(post_id).await? {
            REPORT_SUBMISSIONS_TOTAL.with_label_values(&["post_not_found"]).inc();
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let report = NewReport {
            post_id,
            user_id,
            reason: request.report_reason.unwrap_or_default(),
            additional_info: request.additional_info,
        };

        match self.store.insert(report).await {
            Ok(report) => {
                REPORT_SUBMISSIONS_TOTAL.with_label_values(&["created"]).inc();
                info!(report_id = %report.id, post_id = %post_id, user_id = %user_id, "Post reported");
                Ok(report)
            }
            Err(AppError::Conflict(message)) => {
                REPORT_SUBMISSIONS_TOTAL.with_label_values(&["duplicate"]).inc();
                warn!(post_id = %post_id, user_id = %user_id, "Duplicate report rejected");
                Err(AppError::Conflict(message))
            }
            Err(AppError::NotFound(_)) => {
                // Post deleted between the existence check and the insert.
                REPORT_SUBMISSIONS_TOTAL.with_label_values(&["post_not_found"]).inc();
                Err(AppError::NotFound("Post not found".to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Parse the moderation queue's `status` filter; absent means pending.
    pub fn status_filter(raw: Option<&str>) -> Result<ReportStatus> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(ReportStatus::Pending),
            Some(value) => value.parse().map_err(|_| {
                AppError::invalid_field(
                    "status",
                    "in",
                    "The selected status is invalid.",
                )
            }),
        }
    }

    /// Parse the status a moderator asked for.
    pub fn review_target(raw: Option<&str>) -> Result<ReportStatus> {
        let Some(value) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Err(AppError::invalid_field(
                "status",
                "required",
                "The status field is required.",
            ));
        };
        match value.parse() {
            Ok(ReportStatus::Pending) | Err(_) => Err(AppError::invalid_field(
                "status",
                "in",
                "The status must be reviewed or resolved.",
            )),
            Ok(status) => Ok(status),
        }
    }

    pub async fn queue(
        &self,
        status: ReportStatus,
        request: PageRequest,
        url: &PageUrl,
    ) -> Result<Paginated<PostReport>> {
        let total = self.store.count(status).await?.max(0) as u64;
        let reports = if request.offset() >= total {
            Vec::new()
        } else {
            let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
            self.store
                .list(status, i64::from(request.per_page()), offset)
                .await?
        };
        Ok(Paginated::new(reports, request, total, url))
    }

    /// Apply a moderation decision.
    pub async fn review(
        &self,
        report_id: Uuid,
        next: ReportStatus,
        reviewer: Uuid,
    ) -> Result<PostReport> {
        if next == ReportStatus::Pending {
            return Err(AppError::invalid_field(
                "status",
                "in",
                "The status must be reviewed or resolved.",
            ));
        }

        let current = self
            .store
            .find(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Report cannot move from {} to {}",
                current.status, next
            )));
        }

        let updated = self
            .store
            .update_status(report_id, current.status, next, reviewer)
            .await?
            .ok_or_else(|| AppError::Conflict("Report was updated by another moderator".to_string()))?;

        REPORT_REVIEWS_TOTAL.with_label_values(&[next.as_str()]).inc();
        info!(report_id = %report_id, reviewer = %reviewer, status = %next, "Report reviewed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_reason_is_missing() {
        let request = ReportPostRequest {
            report_reason: Some("   ".to_string()),
            additional_info: Some("".to_string()),
        }
        .normalized();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("report_reason"));
        assert_eq!(request.additional_info, None);
    }

    #[test]
    fn length_limits_apply_after_trimming() {
        let ok = ReportPostRequest {
            report_reason: Some(format!("  {}  ", "r".repeat(255))),
            additional_info: Some("i".repeat(1000)),
        }
        .normalized();
        assert!(ok.validate().is_ok());

        let too_long = ReportPostRequest {
            report_reason: Some("r".repeat(256)),
            additional_info: Some("i".repeat(1001)),
        }
        .normalized();
        let errors = too_long.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("report_reason"));
        assert!(errors.field_errors().contains_key("additional_info"));
    }

    #[test]
    fn status_filter_defaults_to_pending() {
        assert_eq!(ReportService::status_filter(None).unwrap(), ReportStatus::Pending);
        assert_eq!(ReportService::status_filter(Some("")).unwrap(), ReportStatus::Pending);
        assert_eq!(
            ReportService::status_filter(Some("resolved")).unwrap(),
            ReportStatus::Resolved
        );
        assert!(ReportService::status_filter(Some("closed")).is_err());
    }

    #[test]
    fn review_target_accepts_only_forward_states() {
        assert_eq!(
            ReportService::review_target(Some(" reviewed ")).unwrap(),
            ReportStatus::Reviewed
        );
        assert_eq!(
            ReportService::review_target(Some("resolved")).unwrap(),
            ReportStatus::Resolved
        );

        for raw in [None, Some(""), Some("pending"), Some("closed")] {
            match ReportService::review_target(raw) {
                Err(AppError::Validation(errors)) => {
                    assert!(errors.field_errors().contains_key("status"), "{:?}", raw)
                }
                other => panic!("{:?} was accepted: {:?}", raw, other.ok()),
            }
        }
    }
}
