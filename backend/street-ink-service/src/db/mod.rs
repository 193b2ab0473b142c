/// Database access layer
///
/// Free functions per table taking `&PgPool` (or a transaction), plus the
/// Postgres implementations of the feed and report seams.
pub mod comment_repo;
pub mod feed_repo;
pub mod like_repo;
pub mod post_repo;
pub mod report_repo;
pub mod share_repo;
pub mod tag_repo;
pub mod user_repo;

pub use feed_repo::PgFeedSource;
pub use report_repo::PgReportStore;
