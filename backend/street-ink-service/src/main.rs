use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use street_ink_service::config::{Config, StorageDriver};
use street_ink_service::db::{PgFeedSource, PgReportStore};
use street_ink_service::handlers::{self, HealthState};
use street_ink_service::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use street_ink_service::openapi::ApiDoc;
use street_ink_service::services::{
    ArtistService, EngagementService, FeedService, PostService, ProfileService, ReportService,
    ShareService,
};
use street_ink_service::storage::{MediaStorage, MemoryStorage, S3Storage};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn build_storage(config: &Config) -> Arc<dyn MediaStorage> {
    match config.storage.driver {
        StorageDriver::S3 => Arc::new(
            S3Storage::from_env(&config.storage.bucket, &config.storage.public_base_url).await,
        ),
        StorageDriver::Memory => {
            tracing::warn!("Using in-memory media storage; uploads are lost on restart");
            Arc::new(MemoryStorage::new(&config.storage.public_base_url))
        }
    }
}

/// Street & Ink Service
///
/// Serves the merged feed, post reporting and the supporting community
/// endpoints under `/api/v1`.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting street-ink-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_config = db_pool::DbConfig::for_service("street-ink-service", &config.database.url);
    db_config.log_config();
    let pool = db_pool::create_pool(db_config)
        .await
        .context("failed to create database pool")?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let media = build_storage(&config).await;

    let feed = web::Data::new(FeedService::new(
        Arc::new(PgFeedSource::new(pool.clone())),
        media.clone(),
        config.feed.clone(),
    ));
    let reports = web::Data::new(ReportService::new(Arc::new(PgReportStore::new(pool.clone()))));
    let posts = web::Data::new(PostService::new(
        pool.clone(),
        media.clone(),
        config.uploads.clone(),
    ));
    let shares = web::Data::new(ShareService::new(pool.clone()));
    let engagement = web::Data::new(EngagementService::new(pool.clone()));
    let profile = web::Data::new(ProfileService::new(
        pool.clone(),
        media.clone(),
        config.uploads.clone(),
    ));
    let artists = web::Data::new(ArtistService::new(pool.clone(), media.clone()));
    let uploads = web::Data::new(config.uploads.clone());
    let health = web::Data::new(HealthState::new(pool.clone()));

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api/v1/openapi.json", openapi_doc.clone()),
            )
            .route("/api/v1/openapi.json", web::get().to(openapi_json))
            .app_data(feed.clone())
            .app_data(reports.clone())
            .app_data(posts.clone())
            .app_data(shares.clone())
            .app_data(engagement.clone())
            .app_data(profile.clone())
            .app_data(artists.clone())
            .app_data(uploads.clone())
            .app_data(health.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(street_ink_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(handlers::health::health_summary))
            .route("/api/v1/health/ready", web::get().to(handlers::health::readiness))
            .route("/api/v1/health/live", web::get().to(handlers::health::liveness))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware::new(&server_config.auth.jwt_secret))
                    .wrap(MetricsMiddleware)
                    .configure(handlers::configure),
            )
    })
    .bind(bind_addr)?
    .shutdown_timeout(30)
    .run();

    let handle = server.handle();
    tokio::select! {
        result = server => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping server");
            handle.stop(true).await;
        }
    }

    pool.close().await;
    tracing::info!("street-ink-service stopped");
    Ok(())
}
