/// Data models for Street & Ink service
///
/// - `user`: accounts and the public author summary
/// - `post`: original posts, shared posts and tags
/// - `engagement`: likes and comments on either kind of post
/// - `report`: moderation reports against posts
pub mod engagement;
pub mod post;
pub mod report;
pub mod user;

pub use engagement::{CommentView, EngagementTarget, TargetKind};
pub use post::{NewPost, Post, SharedPost, Tag};
pub use report::{NewReport, PostReport, ReportStatus};
pub use user::{User, UserRole, UserSummary};
