use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Moderation lifecycle of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
        }
    }

    /// Reports only move forward: pending -> reviewed -> resolved, and pending
    /// may jump straight to resolved.
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (ReportStatus::Pending, ReportStatus::Reviewed)
                | (ReportStatus::Pending, ReportStatus::Resolved)
                | (ReportStatus::Reviewed, ReportStatus::Resolved)
        )
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "resolved" => Ok(ReportStatus::Resolved),
            other => Err(format!("unknown report status '{}'", other)),
        }
    }
}

impl TryFrom<String> for ReportStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct PostReport {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub additional_info: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ReportStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new report
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub additional_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        use ReportStatus::*;

        assert!(Pending.can_transition_to(Reviewed));
        assert!(Pending.can_transition_to(Resolved));
        assert!(Reviewed.can_transition_to(Resolved));

        assert!(!Pending.can_transition_to(Pending));
        assert!(!Reviewed.can_transition_to(Pending));
        assert!(!Resolved.can_transition_to(Reviewed));
        assert!(!Resolved.can_transition_to(Resolved));
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert_eq!("reviewed".parse::<ReportStatus>(), Ok(ReportStatus::Reviewed));
        assert!(ReportStatus::try_from("closed".to_string()).is_err());
    }
}
