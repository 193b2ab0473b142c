/// Street & Ink Service Library
///
/// Community service for street artists: a merged, paginated feed of original
/// and shared posts, post reporting with a moderation queue, and the
/// supporting post, share, like, comment, profile, directory and map surfaces.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `services`: Business logic layer (feed aggregation, reports, posts, ...)
/// - `db`: Database access layer and repositories
/// - `models`: Data structures for users, posts, shares, tags, reports
/// - `storage`: Object storage for uploaded images
/// - `middleware`: HTTP middleware for authentication and metrics
/// - `pagination`: Length-aware page requests and metadata
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod multipart;
pub mod openapi;
pub mod pagination;
pub mod services;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};
