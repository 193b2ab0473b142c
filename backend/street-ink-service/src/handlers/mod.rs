/// HTTP handlers for street-ink-service
///
/// - Feed: merged original/shared timeline
/// - Reports: reporting posts and the admin moderation queue
/// - Posts, shares, likes, comments, profile, artists and map markers
///
/// `configure` registers every route relative to the `/api/v1` scope.
pub mod admin;
pub mod artists;
pub mod engagement;
pub mod feed;
pub mod health;
pub mod posts;
pub mod profile;
pub mod reports;

use actix_web::web;

pub use feed::get_feed;
pub use health::HealthState;
pub use reports::report_post;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/feed").route(web::get().to(feed::get_feed)))
        .service(
            web::scope("/posts")
                .service(web::resource("").route(web::post().to(posts::create_post)))
                .service(web::resource("/{post_id}").route(web::get().to(posts::get_post)))
                .service(
                    web::resource("/{post_id}/report").route(web::post().to(reports::report_post)),
                )
                .service(web::resource("/{post_id}/share").route(web::post().to(posts::share_post)))
                .service(
                    web::resource("/{post_id}/like")
                        .route(web::post().to(engagement::like_post))
                        .route(web::delete().to(engagement::unlike_post)),
                )
                .service(
                    web::resource("/{post_id}/comments")
                        .route(web::post().to(engagement::comment_on_post)),
                ),
        )
        .service(
            web::scope("/shares")
                .service(
                    web::resource("/{share_id}/like")
                        .route(web::post().to(engagement::like_share))
                        .route(web::delete().to(engagement::unlike_share)),
                )
                .service(
                    web::resource("/{share_id}/comments")
                        .route(web::post().to(engagement::comment_on_share)),
                ),
        )
        .service(
            web::resource("/profile")
                .route(web::get().to(profile::get_profile))
                .route(web::put().to(profile::update_profile)),
        )
        .service(web::resource("/artists").route(web::get().to(artists::list_artists)))
        .service(web::resource("/map/posts").route(web::get().to(posts::map_posts)))
        .service(
            web::scope("/admin")
                .service(web::resource("/reports").route(web::get().to(admin::list_reports)))
                .service(
                    web::resource("/reports/{report_id}")
                        .route(web::patch().to(admin::review_report)),
                ),
        );
}
