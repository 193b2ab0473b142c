use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::post_repo;
use crate::error::Result;
use crate::models::{NewReport, PostReport, ReportStatus};
use crate::services::reports::ReportStore;

const REPORT_COLUMNS: &str = "id, post_id, user_id, reason, additional_info, status, \
     reviewed_at, reviewed_by, created_at, updated_at";

/// `ReportStore` over the `post_reports` table
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn post_exists(&self, post_id: Uuid) -> Result<bool> {
        Ok(post_repo::post_exists(&self.pool, post_id).await?)
    }

    async fn insert(&self, report: NewReport) -> Result<PostReport> {
        let sql = format!(
            r#"
            INSERT INTO post_reports (post_id, user_id, reason, additional_info)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );
        let row = sqlx::query_as::<_, PostReport>(&sql)
            .bind(report.post_id)
            .bind(report.user_id)
            .bind(&report.reason)
            .bind(report.additional_info.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, status: ReportStatus, limit: i64, offset: i64) -> Result<Vec<PostReport>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM post_reports
            WHERE status = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
            REPORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, PostReport>(&sql)
            .bind(status.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self, status: ReportStatus) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM post_reports WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn find(&self, report_id: Uuid) -> Result<Option<PostReport>> {
        let sql = format!("SELECT {} FROM post_reports WHERE id = $1", REPORT_COLUMNS);
        let row = sqlx::query_as::<_, PostReport>(&sql)
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        report_id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
        reviewer: Uuid,
    ) -> Result<Option<PostReport>> {
        let sql = format!(
            r#"
            UPDATE post_reports
            SET status = $3, reviewed_at = NOW(), reviewed_by = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );
        let row = sqlx::query_as::<_, PostReport>(&sql)
            .bind(report_id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(reviewer)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
