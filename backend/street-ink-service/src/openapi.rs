/// OpenAPI documentation for the Street & Ink service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::handlers::posts::CreatePostForm;
use crate::handlers::profile::UpdateProfileForm;
use crate::models::{CommentView, PostReport, ReportStatus, SharedPost, Tag, User, UserRole, UserSummary};
use crate::pagination::PageMeta;
use crate::services::feed::{FeedItem, FeedPage, Location, PostContent};
use crate::services::engagement::{CommentRequest, LikeState};
use crate::services::posts::{MapMarker, PostView};
use crate::services::profile::{ProfileUpdated, ProfileView};
use crate::services::shares::SharePostRequest;
use crate::services::reports::{ReportPostRequest, ReviewReportRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Street & Ink API",
        version = "1.0.0",
        description = "Street art community service: a merged feed of original and shared posts, post reporting and moderation, posting, sharing, likes, comments, profiles, the artist directory and map markers.",
        contact(
            name = "Street & Ink Team",
            email = "team@streetandink.art"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(
        handlers::feed::get_feed,
        handlers::reports::report_post,
        handlers::posts::create_post,
        handlers::posts::get_post,
        handlers::posts::share_post,
        handlers::posts::map_posts,
        handlers::engagement::like_post,
        handlers::engagement::unlike_post,
        handlers::engagement::comment_on_post,
        handlers::engagement::like_share,
        handlers::engagement::unlike_share,
        handlers::engagement::comment_on_share,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::artists::list_artists,
        handlers::admin::list_reports,
        handlers::admin::review_report,
    ),
    components(schemas(
        FeedPage,
        FeedItem,
        PostContent,
        Location,
        PageMeta,
        Tag,
        UserSummary,
        CommentView,
        PostView,
        MapMarker,
        PostReport,
        ReportStatus,
        ReportPostRequest,
        ReviewReportRequest,
        CreatePostForm,
        SharePostRequest,
        SharedPost,
        LikeState,
        CommentRequest,
        User,
        UserRole,
        ProfileView,
        ProfileUpdated,
        UpdateProfileForm,
    )),
    tags(
        (name = "feed", description = "Merged timeline of original and shared posts"),
        (name = "reports", description = "Post reporting and moderation"),
        (name = "posts", description = "Posts, sharing, likes and comments"),
        (name = "profile", description = "The signed-in artist's profile"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 token issued by the account service"))
                        .build(),
                ),
            )
        }
    }
}
