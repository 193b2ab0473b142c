/// Post service - post creation, single-post reads and map markers
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::config::UploadConfig;
use crate::db::{post_repo, tag_repo};
use crate::error::{AppError, Result};
use crate::models::{NewPost, Post, Tag};
use crate::pagination::PageRequest;
use crate::storage::{MediaStorage, UploadedFile};
use crate::validation::{check_image, trimmed};

pub const POST_IMAGE_DIRECTORY: &str = "posts";

/// Raw create-post form as collected from multipart
#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub location_name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub image: Option<UploadedFile>,
}

#[derive(Debug, Validate)]
struct PostFields {
    #[validate(
        required(message = "The caption field is required."),
        length(max = 255, message = "The caption may not be greater than 255 characters.")
    )]
    caption: Option<String>,

    #[validate(length(max = 255, message = "The location name may not be greater than 255 characters."))]
    location_name: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "The latitude must be between -90 and 90."))]
    latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "The longitude must be between -180 and 180."))]
    longitude: Option<f64>,
}

fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Parse an optional numeric form value; `Err` carries the validation error.
fn parse_coordinate(field: &str, raw: Option<String>) -> std::result::Result<Option<f64>, ValidationError> {
    match trimmed(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| field_error("numeric", format!("The {} must be a number.", field))),
    }
}

/// Post with tags and a resolved image URL
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub caption: String,
    pub image_url: String,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, tags: Vec<Tag>, media: &dyn MediaStorage) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            image_url: media.public_url(&post.image_url),
            caption: post.caption,
            location_name: post.location_name,
            latitude: post.latitude,
            longitude: post.longitude,
            tags,
            created_at: post.created_at,
        }
    }
}

/// A geolocated post for the map
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapMarker {
    pub id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub image_url: String,
}

impl MapMarker {
    /// `None` unless the post has both coordinates.
    pub fn from_post(post: &Post, tags: &[Tag], media: &dyn MediaStorage) -> Option<Self> {
        let (latitude, longitude) = (post.latitude?, post.longitude?);
        let title = if post.caption.trim().is_empty() {
            "Untitled".to_string()
        } else {
            post.caption.clone()
        };

        Some(Self {
            id: post.id,
            title,
            tags: tags.iter().map(|t| t.name.clone()).collect(),
            latitude,
            longitude,
            location_name: post.location_name.clone().unwrap_or_default(),
            image_url: media.public_url(&post.image_url),
        })
    }
}

#[derive(Clone)]
pub struct PostService {
    pool: PgPool,
    media: Arc<dyn MediaStorage>,
    uploads: UploadConfig,
}

impl PostService {
    pub fn new(pool: PgPool, media: Arc<dyn MediaStorage>, uploads: UploadConfig) -> Self {
        Self {
            pool,
            media,
            uploads,
        }
    }

    /// Validate the form, store the image, then write the post and its tags.
    pub async fn create_post(&self, user_id: Uuid, input: CreatePostInput) -> Result<PostView> {
        let mut errors = ValidationErrors::new();

        let latitude = parse_coordinate("latitude", input.latitude).unwrap_or_else(|e| {
            errors.add("latitude", e);
            None
        });
        let longitude = parse_coordinate("longitude", input.longitude).unwrap_or_else(|e| {
            errors.add("longitude", e);
            None
        });

        let fields = PostFields {
            caption: trimmed(input.caption),
            location_name: trimmed(input.location_name),
            latitude,
            longitude,
        };
        if let Err(field_errors) = fields.validate() {
            for (field, errs) in field_errors.field_errors() {
                for err in errs {
                    errors.add(field, err.clone());
                }
            }
        }

        let tag_ids = match self.resolve_tags(&input.tags).await? {
            Some(ids) => ids,
            None => {
                errors.add(
                    "tags",
                    field_error("exists", "The selected tags are invalid.".to_string()),
                );
                Vec::new()
            }
        };

        let image = match input.image {
            None => {
                errors.add(
                    "image_url",
                    field_error("required", "The image url field is required.".to_string()),
                );
                None
            }
            Some(file) => match check_image("image_url", &file, self.uploads.post_image_max_bytes) {
                Ok(()) => Some(file),
                Err(AppError::Validation(image_errors)) => {
                    for (field, errs) in image_errors.field_errors() {
                        for err in errs {
                            errors.add(field, err.clone());
                        }
                    }
                    None
                }
                Err(other) => return Err(other),
            },
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let (Some(caption), Some(image)) = (fields.caption, image) else {
            return Err(AppError::Internal("validated post form lost its fields".to_string()));
        };

        let path = self.media.store(POST_IMAGE_DIRECTORY, image).await?;
        let new_post = NewPost {
            user_id,
            caption,
            image_url: path.clone(),
            location_name: fields.location_name,
            latitude: fields.latitude,
            longitude: fields.longitude,
        };

        let (post, tags) = match post_repo::create_post_with_tags(&self.pool, &new_post, &tag_ids).await {
            Ok(created) => created,
            Err(err) => {
                if let Err(cleanup) = self.media.delete(&path).await {
                    warn!(path = %path, "Failed to remove orphaned upload: {}", cleanup);
                }
                return Err(err.into());
            }
        };

        info!(post_id = %post.id, user_id = %user_id, tags = tags.len(), "Post created");
        Ok(PostView::new(post, tags, self.media.as_ref()))
    }

    /// Parse and check tag ids. `None` when any id is malformed or unknown.
    async fn resolve_tags(&self, raw: &[String]) -> Result<Option<Vec<Uuid>>> {
        let mut ids = Vec::new();
        for value in raw.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
            match Uuid::parse_str(value) {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => return Ok(None),
            }
        }
        if ids.is_empty() {
            return Ok(Some(ids));
        }

        let existing = tag_repo::existing_tag_ids(&self.pool, &ids).await?;
        if existing.len() == ids.len() {
            Ok(Some(ids))
        } else {
            Ok(None)
        }
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostView> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
        let mut tags = tag_repo::tags_for_posts(&self.pool, &[post.id]).await?;
        let tags = tags.remove(&post.id).unwrap_or_default();
        Ok(PostView::new(post, tags, self.media.as_ref()))
    }

    /// Markers for the geolocated posts among the newest-posts page `request`.
    pub async fn map_markers(&self, request: PageRequest) -> Result<Vec<MapMarker>> {
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let posts = post_repo::latest_posts(&self.pool, i64::from(request.per_page()), offset).await?;

        let located: Vec<&Post> = posts.iter().filter(|p| p.has_coordinates()).collect();
        let ids: Vec<Uuid> = located.iter().map(|p| p.id).collect();
        let tags = tag_repo::tags_for_posts(&self.pool, &ids).await?;

        Ok(located
            .into_iter()
            .filter_map(|post| {
                let post_tags = tags.get(&post.id).map(Vec::as_slice).unwrap_or(&[]);
                MapMarker::from_post(post, post_tags, self.media.as_ref())
            })
            .collect())
    }
}
