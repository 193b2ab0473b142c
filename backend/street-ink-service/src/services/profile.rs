/// Profile read and update, including avatar and cover photo replacement
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::posts::PostView;
use crate::config::UploadConfig;
use crate::db::user_repo::{self, ProfileChanges};
use crate::db::{post_repo, tag_repo};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::storage::{MediaStorage, UploadedFile};
use crate::validation::{check_image, trimmed};

pub const AVATAR_DIRECTORY: &str = "avatars";
pub const COVER_PHOTO_DIRECTORY: &str = "cover_photos";

/// Raw profile form as collected from multipart
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub avatar: Option<UploadedFile>,
    pub cover_photo: Option<UploadedFile>,
}

#[derive(Debug, Clone, Validate)]
struct ProfileFields {
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name may not be greater than 255 characters.")
    )]
    name: Option<String>,

    #[validate(
        required(message = "The username field is required."),
        length(max = 255, message = "The username may not be greater than 255 characters.")
    )]
    username: Option<String>,

    #[validate(length(max = 500, message = "The bio may not be greater than 500 characters."))]
    bio: Option<String>,

    #[validate(length(max = 255, message = "The location may not be greater than 255 characters."))]
    location: Option<String>,

    #[validate(
        url(message = "The website format is invalid."),
        length(max = 255, message = "The website may not be greater than 255 characters.")
    )]
    website: Option<String>,

    #[validate(length(max = 255, message = "The instagram may not be greater than 255 characters."))]
    instagram: Option<String>,

    #[validate(length(max = 255, message = "The tiktok may not be greater than 255 characters."))]
    tiktok: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileView {
    pub user: User,
    pub avatar_url: Option<String>,
    pub cover_photo_url: Option<String>,
    pub posts: Vec<PostView>,
    pub artworks_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileUpdated {
    pub success: bool,
    pub user: User,
    pub avatar_url: Option<String>,
    pub cover_photo_url: Option<String>,
}

fn merge_errors(into: &mut ValidationErrors, from: ValidationErrors) {
    for (field, errs) in from.field_errors() {
        for err in errs {
            into.add(field, err.clone());
        }
    }
}

/// Image-bearing profile columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Avatar,
    CoverPhoto,
}

impl ImageSlot {
    pub fn directory(&self) -> &'static str {
        match self {
            ImageSlot::Avatar => AVATAR_DIRECTORY,
            ImageSlot::CoverPhoto => COVER_PHOTO_DIRECTORY,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            ImageSlot::Avatar => "avatar",
            ImageSlot::CoverPhoto => "cover_photo",
        }
    }

    fn current<'a>(&self, user: &'a User) -> Option<&'a str> {
        match self {
            ImageSlot::Avatar => user.avatar.as_deref(),
            ImageSlot::CoverPhoto => user.cover_photo.as_deref(),
        }
    }
}

/// Storage changes made so far by one profile update
#[derive(Debug, Default)]
struct StagedImages {
    stored: Vec<(ImageSlot, String)>,
    /// Slots whose previous object is already gone from storage
    removed: Vec<ImageSlot>,
}

impl StagedImages {
    fn path(&self, slot: ImageSlot) -> Option<String> {
        self.stored
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, path)| path.clone())
    }

    /// Delete every object stored so far and return the slots left without an object.
    async fn discard(self, media: &dyn MediaStorage) -> Vec<ImageSlot> {
        for (_, path) in &self.stored {
            if let Err(err) = media.delete(path).await {
                warn!(path = %path, "Failed to delete orphaned upload: {}", err);
            }
        }
        self.removed
    }
}

/// Replace each slot's object, deleting the previous one before storing the new one.
async fn stage_images(
    media: &dyn MediaStorage,
    current: &User,
    uploads: Vec<(ImageSlot, UploadedFile)>,
    staged: &mut StagedImages,
) -> Result<()> {
    for (slot, file) in uploads {
        if let Some(old) = slot.current(current) {
            match media.delete(old).await {
                Ok(()) => staged.removed.push(slot),
                Err(err) => warn!(path = %old, "Failed to delete previous image: {}", err),
            }
        }
        let path = media.store(slot.directory(), file).await?;
        staged.stored.push((slot, path));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
    media: Arc<dyn MediaStorage>,
    uploads: UploadConfig,
}

impl ProfileService {
    pub fn new(pool: PgPool, media: Arc<dyn MediaStorage>, uploads: UploadConfig) -> Self {
        Self {
            pool,
            media,
            uploads,
        }
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User> {
        user_repo::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn url(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.media.public_url(p))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<ProfileView> {
        let user = self.load_user(user_id).await?;
        let posts = post_repo::find_posts_by_user(&self.pool, user_id).await?;
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut tags = tag_repo::tags_for_posts(&self.pool, &ids).await?;

        let posts: Vec<PostView> = posts
            .into_iter()
            .map(|post| {
                let post_tags = tags.remove(&post.id).unwrap_or_default();
                PostView::new(post, post_tags, self.media.as_ref())
            })
            .collect();

        Ok(ProfileView {
            avatar_url: self.url(user.avatar.as_deref()),
            cover_photo_url: self.url(user.cover_photo.as_deref()),
            artworks_count: posts.len() as i64,
            posts,
            user,
        })
    }

    /// Undo the storage side of a failed update.
    async fn abandon(&self, user_id: Uuid, staged: StagedImages) {
        for slot in staged.discard(self.media.as_ref()).await {
            if let Err(err) = user_repo::clear_image(&self.pool, user_id, slot.column()).await {
                warn!(user_id = %user_id, column = slot.column(), "Failed to clear image column: {}", err);
            }
        }
    }

    pub async fn update(&self, user_id: Uuid, input: ProfileInput) -> Result<ProfileUpdated> {
        let fields = ProfileFields {
            name: trimmed(input.name),
            username: trimmed(input.username),
            bio: trimmed(input.bio),
            location: trimmed(input.location),
            website: trimmed(input.website),
            instagram: trimmed(input.instagram),
            tiktok: trimmed(input.tiktok),
        };

        let mut errors = ValidationErrors::new();
        if let Err(field_errors) = fields.validate() {
            merge_errors(&mut errors, field_errors);
        }
        let uploads = [
            ("avatar", input.avatar.as_ref(), self.uploads.avatar_max_bytes),
            ("cover_photo", input.cover_photo.as_ref(), self.uploads.cover_max_bytes),
        ];
        for (field, file, max) in uploads {
            if let Some(file) = file {
                match check_image(field, file, max) {
                    Ok(()) => {}
                    Err(AppError::Validation(image_errors)) => merge_errors(&mut errors, image_errors),
                    Err(other) => return Err(other),
                }
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let (Some(name), Some(username)) = (fields.name, fields.username) else {
            return Err(AppError::Internal("validated profile form lost its fields".to_string()));
        };

        let current = self.load_user(user_id).await?;
        if user_repo::username_taken(&self.pool, &username, user_id).await? {
            return Err(AppError::Conflict("The username has already been taken".to_string()));
        }

        let mut uploads = Vec::new();
        if let Some(file) = input.avatar {
            uploads.push((ImageSlot::Avatar, file));
        }
        if let Some(file) = input.cover_photo {
            uploads.push((ImageSlot::CoverPhoto, file));
        }

        let mut staged = StagedImages::default();
        if let Err(err) = stage_images(self.media.as_ref(), &current, uploads, &mut staged).await {
            self.abandon(user_id, staged).await;
            return Err(err);
        }

        let changes = ProfileChanges {
            name,
            username,
            bio: fields.bio,
            location: fields.location,
            website: fields.website,
            instagram: fields.instagram,
            tiktok: fields.tiktok,
            avatar: staged.path(ImageSlot::Avatar),
            cover_photo: staged.path(ImageSlot::CoverPhoto),
        };
        let user = match user_repo::update_profile(&self.pool, user_id, &changes).await {
            Ok(user) => user,
            Err(err) => {
                self.abandon(user_id, staged).await;
                return Err(err.into());
            }
        };

        info!(
            user_id = %user_id,
            avatar_replaced = changes.avatar.is_some(),
            cover_replaced = changes.cover_photo.is_some(),
            "Profile updated"
        );

        Ok(ProfileUpdated {
            success: true,
            avatar_url: self.url(user.avatar.as_deref()),
            cover_photo_url: self.url(user.cover_photo.as_deref()),
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use chrono::Utc;

    /// Memory storage that refuses uploads into one directory
    struct RejectingStorage {
        inner: MemoryStorage,
        directory: &'static str,
    }

    #[async_trait]
    impl MediaStorage for RejectingStorage {
        async fn store(&self, directory: &str, file: UploadedFile) -> Result<String> {
            if directory == self.directory {
                return Err(AppError::Storage("bucket unavailable".to_string()));
            }
            self.inner.store(directory, file).await
        }

        async fn delete(&self, path: &str) -> Result<()> {
            self.inner.delete(path).await
        }

        fn public_url(&self, path: &str) -> String {
            self.inner.public_url(path)
        }
    }

    fn png() -> UploadedFile {
        UploadedFile {
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
            content_type: mime::IMAGE_PNG,
            file_name: Some("me.png".to_string()),
        }
    }

    fn user_with_images(avatar: Option<&str>, cover_photo: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Banksy".to_string(),
            username: Some("banksy".to_string()),
            email: "banksy@example.test".to_string(),
            avatar: avatar.map(str::to_string),
            cover_photo: cover_photo.map(str::to_string),
            bio: None,
            location: None,
            website: None,
            instagram: None,
            tiktok: None,
            role: UserRole::Member,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn previous_image_is_deleted_before_the_new_one_is_stored() {
        let media = MemoryStorage::new("/storage");
        media.insert("avatars/old.png", png());
        let user = user_with_images(Some("avatars/old.png"), None);

        let mut staged = StagedImages::default();
        stage_images(&media, &user, vec![(ImageSlot::Avatar, png())], &mut staged)
            .await
            .unwrap();

        let new_path = staged.path(ImageSlot::Avatar).unwrap();
        assert!(new_path.starts_with("avatars/"));
        assert!(media.contains(&new_path));
        assert!(!media.contains("avatars/old.png"));
        assert_eq!(staged.path(ImageSlot::CoverPhoto), None);
    }

    #[tokio::test]
    async fn failed_cover_store_leaves_no_new_objects() {
        let media = RejectingStorage {
            inner: MemoryStorage::new("/storage"),
            directory: COVER_PHOTO_DIRECTORY,
        };
        media.inner.insert("avatars/old.png", png());
        media.inner.insert("cover_photos/old.png", png());
        let user = user_with_images(Some("avatars/old.png"), Some("cover_photos/old.png"));

        let mut staged = StagedImages::default();
        let uploads = vec![(ImageSlot::Avatar, png()), (ImageSlot::CoverPhoto, png())];
        let result = stage_images(&media, &user, uploads, &mut staged).await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        let orphan = staged.path(ImageSlot::Avatar).unwrap();
        let cleared = staged.discard(&media).await;

        assert!(!media.inner.contains(&orphan));
        assert!(media.inner.is_empty());
        assert_eq!(cleared, vec![ImageSlot::Avatar, ImageSlot::CoverPhoto]);
    }

    #[tokio::test]
    async fn discarding_after_a_database_failure_removes_stored_uploads() {
        let media = MemoryStorage::new("/storage");
        let user = user_with_images(None, None);

        let mut staged = StagedImages::default();
        let uploads = vec![(ImageSlot::Avatar, png()), (ImageSlot::CoverPhoto, png())];
        stage_images(&media, &user, uploads, &mut staged).await.unwrap();
        assert_eq!(media.len(), 2);

        let cleared = staged.discard(&media).await;
        assert!(media.is_empty());
        assert!(cleared.is_empty());
    }

    fn fields() -> ProfileFields {
        ProfileFields {
            name: Some("Banksy".to_string()),
            username: Some("banksy".to_string()),
            bio: None,
            location: None,
            website: None,
            instagram: None,
            tiktok: None,
        }
    }

    #[test]
    fn minimal_profile_is_valid() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn website_must_be_a_url() {
        let mut bad = fields();
        bad.website = Some("not a url".to_string());
        assert!(bad.validate().unwrap_err().field_errors().contains_key("website"));

        let mut good = fields();
        good.website = Some("https://streetandink.art/banksy".to_string());
        assert!(good.validate().is_ok());
    }

    #[test]
    fn username_and_bio_rules() {
        let mut profile = fields();
        profile.username = None;
        profile.bio = Some("b".repeat(501));

        let errors = profile.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("bio"));
    }
}
