use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use street_ink_service::error::{AppError, Result};
use street_ink_service::models::{NewReport, PostReport, ReportStatus};
use street_ink_service::services::reports::ReportStore;

/// `ReportStore` enforcing the one-report-per-user-per-post rule under a lock
#[derive(Default)]
pub struct MemoryReportStore {
    posts: Mutex<HashSet<Uuid>>,
    reports: Mutex<Vec<PostReport>>,
}

impl MemoryReportStore {
    pub fn add_post(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.posts.lock().unwrap().insert(id);
        id
    }

    pub fn reports(&self) -> Vec<PostReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn post_exists(&self, post_id: Uuid) -> Result<bool> {
        Ok(self.posts.lock().unwrap().contains(&post_id))
    }

    async fn insert(&self, report: NewReport) -> Result<PostReport> {
        let mut reports = self.reports.lock().unwrap();
        if reports
            .iter()
            .any(|r| r.post_id == report.post_id && r.user_id == report.user_id)
        {
            return Err(AppError::Conflict("You have already reported this post".to_string()));
        }

        let now = Utc::now();
        let stored = PostReport {
            id: Uuid::new_v4(),
            post_id: report.post_id,
            user_id: report.user_id,
            reason: report.reason,
            additional_info: report.additional_info,
            status: ReportStatus::Pending,
            reviewed_at: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        };
        reports.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, status: ReportStatus, limit: i64, offset: i64) -> Result<Vec<PostReport>> {
        let mut matching: Vec<PostReport> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, status: ReportStatus) -> Result<i64> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == status)
            .count() as i64)
    }

    async fn find(&self, report_id: Uuid) -> Result<Option<PostReport>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == report_id)
            .cloned())
    }

    async fn update_status(
        &self,
        report_id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
        reviewer: Uuid,
    ) -> Result<Option<PostReport>> {
        let mut reports = self.reports.lock().unwrap();
        let Some(report) = reports
            .iter_mut()
            .find(|r| r.id == report_id && r.status == from)
        else {
            return Ok(None);
        };

        let now = Utc::now();
        report.status = to;
        report.reviewed_at = Some(now);
        report.reviewed_by = Some(reviewer);
        report.updated_at = now;
        Ok(Some(report.clone()))
    }
}
