//! Shared fixtures for integration tests
//!
//! In-memory implementations of the feed and report seams plus an app
//! builder wired the same way as the binary, minus Postgres.
#![allow(dead_code)]

pub mod memory_feed;
pub mod memory_reports;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{web, App};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

use street_ink_service::config::FeedConfig;
use street_ink_service::handlers;
use street_ink_service::middleware::{issue_token, JwtAuthMiddleware};
use street_ink_service::models::UserRole;
use street_ink_service::services::{FeedService, ReportService};
use street_ink_service::storage::MemoryStorage;

pub use memory_feed::MemoryFeedSource;
pub use memory_reports::MemoryReportStore;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Fixed clock origin so fixtures are reproducible
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn bearer(user_id: Uuid, role: UserRole) -> (header::HeaderName, String) {
    let token = issue_token(SECRET, user_id, role, Duration::hours(1)).unwrap();
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub struct TestState {
    pub feed_source: Arc<MemoryFeedSource>,
    pub report_store: Arc<MemoryReportStore>,
    pub media: Arc<MemoryStorage>,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            feed_source: Arc::new(MemoryFeedSource::default()),
            report_store: Arc::new(MemoryReportStore::default()),
            media: Arc::new(MemoryStorage::new("/storage")),
        }
    }

    pub fn feed_service(&self) -> FeedService {
        FeedService::new(
            self.feed_source.clone(),
            self.media.clone(),
            FeedConfig::default(),
        )
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(self.report_store.clone())
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.feed_service()))
            .app_data(web::Data::new(self.report_service()))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware::new(SECRET))
                    .configure(handlers::configure),
            )
    }
}
