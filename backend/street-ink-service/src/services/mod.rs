/// Business logic layer
///
/// - `feed`: merged original/shared timeline
/// - `reports`: post reporting and moderation
/// - `posts`, `shares`, `engagement`: content creation and interaction
/// - `profile`, `artists`: account surfaces
pub mod artists;
pub mod engagement;
pub mod feed;
pub mod posts;
pub mod profile;
pub mod reports;
pub mod shares;

pub use artists::ArtistService;
pub use engagement::EngagementService;
pub use feed::FeedService;
pub use posts::PostService;
pub use profile::ProfileService;
pub use reports::ReportService;
pub use shares::ShareService;
