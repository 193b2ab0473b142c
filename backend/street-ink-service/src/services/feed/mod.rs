//! Feed aggregation
//!
//! Original posts and shared posts are merged into one reverse-chronological,
//! length-aware paginated timeline. Each entry is resolved once into a tagged
//! `FeedItem`; nothing downstream re-inspects which table it came from.
pub mod aggregator;
pub mod item;
pub mod service;
pub mod source;

pub use aggregator::{merge_page, FeedEntry};
pub use item::{project, FeedItem, Location, PostContent};
pub use service::{FeedPage, FeedService};
pub use source::{FeedDetails, FeedSource};
