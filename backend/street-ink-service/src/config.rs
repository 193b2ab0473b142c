/// Configuration management for Street & Ink service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by the binary).
use db_pool::parse_env_with_default;
use std::fmt;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub feed: FeedConfig,
    pub uploads: UploadConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Apply bundled migrations on startup
    pub run_migrations: bool,
}

/// Bearer token verification settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 shared secret used to verify access tokens
    pub jwt_secret: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDriver {
    S3,
    Memory,
}

/// Object storage for uploaded images
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub driver: StorageDriver,
    pub bucket: String,
    /// Prefix used to turn stored paths into public URLs
    pub public_base_url: String,
}

/// Feed aggregation settings
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub page_size: u32,
    pub trending_tag_limit: i64,
    /// Maximum comments embedded per feed item
    pub comment_preview_limit: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            trending_tag_limit: 10,
            comment_preview_limit: 20,
        }
    }
}

/// Upload size limits in bytes
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub post_image_max_bytes: usize,
    pub avatar_max_bytes: usize,
    pub cover_max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            post_image_max_bytes: 40 * 1024 * 1024,
            avatar_max_bytes: 2 * 1024 * 1024,
            cover_max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("STREET_INK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_with_default("STREET_INK_PORT", 8080),
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if app.is_production() => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };
            if app.is_production() && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }
            CorsConfig { allowed_origins }
        };

        let auth = {
            let jwt_secret = std::env::var("JWT_SECRET")
                .map_err(|_| "JWT_SECRET must be set".to_string())?;
            if app.is_production() && jwt_secret.len() < 32 {
                return Err("JWT_SECRET must be at least 32 bytes in production".to_string());
            }
            AuthConfig { jwt_secret }
        };

        let storage = {
            let driver = match std::env::var("STORAGE_DRIVER")
                .unwrap_or_else(|_| "s3".to_string())
                .to_ascii_lowercase()
                .as_str()
            {
                "s3" => StorageDriver::S3,
                "memory" if !app.is_production() => StorageDriver::Memory,
                "memory" => {
                    return Err("STORAGE_DRIVER=memory is not allowed in production".to_string())
                }
                other => return Err(format!("Unknown STORAGE_DRIVER '{}'", other)),
            };
            let bucket = std::env::var("S3_BUCKET").unwrap_or_default();
            if driver == StorageDriver::S3 && bucket.trim().is_empty() {
                return Err("S3_BUCKET must be set when STORAGE_DRIVER=s3".to_string());
            }
            StorageConfig {
                driver,
                bucket,
                public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "/storage".to_string()),
            }
        };

        let feed_defaults = FeedConfig::default();
        let upload_defaults = UploadConfig::default();

        Ok(Config {
            app,
            cors,
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/street_ink".to_string()),
                run_migrations: parse_env_with_default("RUN_MIGRATIONS", false),
            },
            auth,
            storage,
            feed: FeedConfig {
                page_size: parse_env_with_default("FEED_PAGE_SIZE", feed_defaults.page_size)
                    .max(1),
                trending_tag_limit: parse_env_with_default(
                    "TRENDING_TAG_LIMIT",
                    feed_defaults.trending_tag_limit,
                ),
                comment_preview_limit: parse_env_with_default(
                    "FEED_COMMENT_PREVIEW_LIMIT",
                    feed_defaults.comment_preview_limit,
                ),
            },
            uploads: UploadConfig {
                post_image_max_bytes: parse_env_with_default(
                    "POST_IMAGE_MAX_BYTES",
                    upload_defaults.post_image_max_bytes,
                ),
                avatar_max_bytes: parse_env_with_default(
                    "AVATAR_MAX_BYTES",
                    upload_defaults.avatar_max_bytes,
                ),
                cover_max_bytes: parse_env_with_default(
                    "COVER_MAX_BYTES",
                    upload_defaults.cover_max_bytes,
                ),
            },
        })
    }
}
