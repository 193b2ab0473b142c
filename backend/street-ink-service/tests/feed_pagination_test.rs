//! Feed aggregation over HTTP with an in-memory feed source.

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

use common::{at, bearer, TestState};
use street_ink_service::models::{EngagementTarget, UserRole};

async fn get_feed(state: &TestState, uri: &str) -> Value {
    let app = test::init_service(state.app()).await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "GET {}", uri);
    test::read_body_json(resp).await
}

fn item_ids(body: &Value) -> Vec<String> {
    body["posts"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

fn display_times(body: &Value) -> Vec<DateTime<Utc>> {
    body["posts"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| serde_json::from_value(item["display_at"].clone()).unwrap())
        .collect()
}

/// Twelve posts ten minutes apart and three shares placed around them.
struct Scenario {
    state: TestState,
    page_one: Vec<Uuid>,
    page_two: Vec<Uuid>,
    first_share_time: DateTime<Utc>,
    first_share_post: Uuid,
}

fn twelve_posts_three_shares() -> Scenario {
    let state = TestState::new();
    let source = &state.feed_source;
    let artist = source.add_user("Artist");
    let fan = source.add_user("Fan");

    let posts: Vec<_> = (1..=12).map(|i| source.add_post(&artist, at(i * 10))).collect();
    let newest_share = source.add_share(&fan, &posts[0], at(125));
    let middle_share = source.add_share(&fan, &posts[2], at(65));
    let oldest_share = source.add_share(&fan, &posts[11], at(5));

    let page_one = vec![
        newest_share.id,
        posts[11].id,
        posts[10].id,
        posts[9].id,
        posts[8].id,
        posts[7].id,
        posts[6].id,
        middle_share.id,
        posts[5].id,
        posts[4].id,
    ];
    let page_two = vec![
        posts[3].id,
        posts[2].id,
        posts[1].id,
        posts[0].id,
        oldest_share.id,
    ];

    Scenario {
        state,
        page_one,
        page_two,
        first_share_time: newest_share.created_at,
        first_share_post: posts[0].id,
    }
}

fn as_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

#[actix_web::test]
async fn twelve_posts_and_three_shares_split_across_two_pages() {
    let scenario = twelve_posts_three_shares();

    let first = get_feed(&scenario.state, "/api/v1/feed").await;
    assert_eq!(item_ids(&first), as_strings(&scenario.page_one));

    let meta = &first["posts"]["meta"];
    assert_eq!(meta["total"], 15);
    assert_eq!(meta["per_page"], 10);
    assert_eq!(meta["current_page"], 1);
    assert_eq!(meta["last_page"], 2);
    assert_eq!(meta["from"], 1);
    assert_eq!(meta["to"], 10);
    assert_eq!(meta["prev_page_url"], Value::Null);
    assert_eq!(meta["next_page_url"], "/api/v1/feed?page=2");

    let lead = &first["posts"]["data"][0];
    assert_eq!(lead["kind"], "shared");
    assert_eq!(lead["post"]["id"], scenario.first_share_post.to_string());
    let shown: DateTime<Utc> = serde_json::from_value(lead["display_at"].clone()).unwrap();
    assert_eq!(shown, scenario.first_share_time);

    let second = get_feed(&scenario.state, "/api/v1/feed?page=2").await;
    assert_eq!(item_ids(&second), as_strings(&scenario.page_two));
    assert_eq!(second["posts"]["meta"]["from"], 11);
    assert_eq!(second["posts"]["meta"]["to"], 15);
    assert_eq!(second["posts"]["meta"]["next_page_url"], Value::Null);
    assert_eq!(second["posts"]["meta"]["prev_page_url"], "/api/v1/feed?page=1");
}

#[actix_web::test]
async fn shares_between_two_posts_sit_between_them() {
    let state = TestState::new();
    let source = &state.feed_source;
    let artist = source.add_user("Artist");
    let fan = source.add_user("Fan");

    let posts: Vec<_> = (1..=12).map(|i| source.add_post(&artist, at(i * 10))).collect();
    let early = source.add_share(&fan, &posts[0], at(61));
    let mid = source.add_share(&fan, &posts[1], at(63));
    let late = source.add_share(&fan, &posts[2], at(67));

    let mut page_one: Vec<Uuid> = posts[6..].iter().rev().map(|p| p.id).collect();
    page_one.extend([late.id, mid.id, early.id, posts[5].id]);
    let page_two: Vec<Uuid> = posts[..5].iter().rev().map(|p| p.id).collect();

    let first = get_feed(&state, "/api/v1/feed?page=1").await;
    assert_eq!(item_ids(&first), as_strings(&page_one));
    let kinds: Vec<&str> = first["posts"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["kind"].as_str().unwrap())
        .collect();
    assert_eq!(&kinds[6..9], ["shared", "shared", "shared"]);
    assert_eq!(first["posts"]["meta"]["total"], 15);
    assert_eq!(first["posts"]["meta"]["last_page"], 2);

    let second = get_feed(&state, "/api/v1/feed?page=2").await;
    assert_eq!(item_ids(&second), as_strings(&page_two));
    assert_eq!(second["posts"]["meta"]["total"], 15);
    assert_eq!(second["posts"]["meta"]["last_page"], 2);
}

#[actix_web::test]
async fn pages_partition_the_merged_set_in_display_order() {
    let state = TestState::new();
    let source = &state.feed_source;
    let author = source.add_user("Author");
    let sharer = source.add_user("Sharer");

    let mut expected = HashSet::new();
    let posts: Vec<_> = (0..23)
        .map(|i| source.add_post(&author, at((i * 7) % 50)))
        .collect();
    expected.extend(posts.iter().map(|p| p.id.to_string()));
    for j in 0..17 {
        let share = source.add_share(&sharer, &posts[j % posts.len()], at((j as i64 * 11) % 50));
        expected.insert(share.id.to_string());
    }

    let mut seen = Vec::new();
    let mut times = Vec::new();
    for page in 1..=4 {
        let body = get_feed(&state, &format!("/api/v1/feed?page={}", page)).await;
        assert_eq!(body["posts"]["data"].as_array().unwrap().len(), 10);
        seen.extend(item_ids(&body));
        times.extend(display_times(&body));
    }

    let unique: HashSet<_> = seen.iter().cloned().collect();
    assert_eq!(unique.len(), seen.len(), "an item appeared on two pages");
    assert_eq!(unique, expected);
    assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));

    let past_end = get_feed(&state, "/api/v1/feed?page=5").await;
    assert!(item_ids(&past_end).is_empty());
}

#[actix_web::test]
async fn repeated_requests_return_the_same_page() {
    let scenario = twelve_posts_three_shares();

    let first = get_feed(&scenario.state, "/api/v1/feed?page=2").await;
    let again = get_feed(&scenario.state, "/api/v1/feed?page=2").await;
    assert_eq!(first, again);
}

#[actix_web::test]
async fn page_past_the_end_is_empty_and_skips_the_window_fetch() {
    let scenario = twelve_posts_three_shares();

    let body = get_feed(&scenario.state, "/api/v1/feed?page=99").await;
    assert!(item_ids(&body).is_empty());

    let meta = &body["posts"]["meta"];
    assert_eq!(meta["total"], 15);
    assert_eq!(meta["current_page"], 99);
    assert_eq!(meta["last_page"], 2);
    assert_eq!(meta["from"], Value::Null);
    assert_eq!(meta["to"], Value::Null);
    assert_eq!(meta["next_page_url"], Value::Null);
    assert_eq!(meta["prev_page_url"], "/api/v1/feed?page=98");

    assert!(scenario.state.feed_source.window_fetches().is_empty());
    assert!(scenario.state.feed_source.detail_loads().is_empty());
}

#[actix_web::test]
async fn invalid_page_values_fall_back_to_the_first_page() {
    let scenario = twelve_posts_three_shares();
    let expected = as_strings(&scenario.page_one);

    for uri in [
        "/api/v1/feed?page=abc",
        "/api/v1/feed?page=0",
        "/api/v1/feed?page=-3",
        "/api/v1/feed?page=",
    ] {
        let body = get_feed(&scenario.state, uri).await;
        assert_eq!(body["posts"]["meta"]["current_page"], 1, "{}", uri);
        assert_eq!(item_ids(&body), expected, "{}", uri);
    }
}

#[actix_web::test]
async fn empty_feed_reports_a_single_empty_page() {
    let state = TestState::new();

    let body = get_feed(&state, "/api/v1/feed").await;
    let meta = &body["posts"]["meta"];
    assert_eq!(meta["total"], 0);
    assert_eq!(meta["last_page"], 1);
    assert_eq!(meta["next_page_url"], Value::Null);
    assert!(item_ids(&body).is_empty());
}

#[actix_web::test]
async fn page_links_keep_other_query_parameters() {
    let scenario = twelve_posts_three_shares();

    let body = get_feed(&scenario.state, "/api/v1/feed?tag=murals&page=1").await;
    let meta = &body["posts"]["meta"];
    assert_eq!(meta["next_page_url"], "/api/v1/feed?tag=murals&page=2");
    assert_eq!(meta["first_page_url"], "/api/v1/feed?tag=murals&page=1");
    assert_eq!(meta["last_page_url"], "/api/v1/feed?tag=murals&page=2");
}

#[actix_web::test]
async fn relations_are_loaded_only_for_the_page() {
    let scenario = twelve_posts_three_shares();

    get_feed(&scenario.state, "/api/v1/feed").await;
    assert_eq!(scenario.state.feed_source.window_fetches(), vec![10]);
    assert_eq!(scenario.state.feed_source.detail_loads(), vec![10]);
}

#[actix_web::test]
async fn equal_timestamps_put_original_posts_before_shares() {
    let state = TestState::new();
    let source = &state.feed_source;
    let author = source.add_user("Author");
    let post = source.add_post(&author, at(30));
    let share = source.add_share(&author, &post, at(30));

    let body = get_feed(&state, "/api/v1/feed").await;
    assert_eq!(item_ids(&body), vec![post.id.to_string(), share.id.to_string()]);
}

#[actix_web::test]
async fn engagement_belongs_to_the_selected_entity() {
    let state = TestState::new();
    let source = &state.feed_source;
    let artist = source.add_user("Artist");
    let fan = source.add_user("Fan");
    let post = source.add_post(&artist, at(10));
    let share = source.add_share(&fan, &post, at(20));

    source.set_likes(EngagementTarget::post(post.id), 7);
    source.set_likes(EngagementTarget::shared_post(share.id), 2);
    source.add_comment(EngagementTarget::shared_post(share.id), &artist, "thanks for sharing", at(21));

    let body = get_feed(&state, "/api/v1/feed").await;
    let shared = &body["posts"]["data"][0];
    assert_eq!(shared["kind"], "shared");
    assert_eq!(shared["like_count"], 2);
    assert_eq!(shared["sharer"]["id"], fan.id.to_string());
    assert_eq!(shared["post"]["author"]["id"], artist.id.to_string());
    assert_eq!(shared["comments"][0]["body"], "thanks for sharing");
    assert_eq!(shared["comments"][0]["author"]["name"], "Artist");

    let original = &body["posts"]["data"][1];
    assert_eq!(original["kind"], "original");
    assert_eq!(original["like_count"], 7);
    assert_eq!(original["comments"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn tags_trending_and_artworks_count_accompany_the_page() {
    let state = TestState::new();
    let source = &state.feed_source;
    let viewer = source.add_user("Viewer");
    let other = source.add_user("Other");
    for minute in 0..3 {
        source.add_post(&viewer, at(minute));
    }
    source.add_post(&other, at(10));
    for i in 0..12 {
        source.add_tag(&format!("tag-{:02}", i), i);
    }

    let app = test::init_service(state.app()).await;
    let req = test::TestRequest::get()
        .uri("/api/v1/feed")
        .insert_header(bearer(viewer.id, UserRole::Member))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["artworks_count"], 3);
    assert_eq!(body["tags"].as_array().unwrap().len(), 12);
    let trending = body["trending_tags"].as_array().unwrap();
    assert_eq!(trending.len(), 10);
    assert_eq!(trending[0]["name"], "tag-11");

    let anonymous = get_feed(&state, "/api/v1/feed").await;
    assert_eq!(anonymous["artworks_count"], 0);
}

#[actix_web::test]
async fn invalid_token_is_rejected() {
    let state = TestState::new();
    let app = test::init_service(state.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/feed")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    match test::try_call_service(&app, req).await {
        Ok(resp) => panic!("bad token was accepted with status {}", resp.status()),
        Err(err) => assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED),
    }
}
