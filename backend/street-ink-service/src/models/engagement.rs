use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserSummary;

/// Which table a like or comment hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Post,
    SharedPost,
}

impl TargetKind {
    /// Column holding the target id in `likes` and `comments`.
    pub fn column(&self) -> &'static str {
        match self {
            TargetKind::Post => "post_id",
            TargetKind::SharedPost => "shared_post_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Post => "Post",
            TargetKind::SharedPost => "Shared post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngagementTarget {
    pub kind: TargetKind,
    pub id: Uuid,
}

impl EngagementTarget {
    pub fn post(id: Uuid) -> Self {
        Self {
            kind: TargetKind::Post,
            id,
        }
    }

    pub fn shared_post(id: Uuid) -> Self {
        Self {
            kind: TargetKind::SharedPost,
            id,
        }
    }
}

/// Comment with its author resolved
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
}
