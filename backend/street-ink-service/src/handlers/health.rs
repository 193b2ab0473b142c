use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

#[derive(Clone)]
pub struct HealthState {
    pool: PgPool,
}

impl HealthState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    ready: bool,
    postgres: ComponentCheck,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ComponentCheck {
    healthy: bool,
    message: String,
    latency_ms: u64,
}

/// GET /api/v1/health
pub async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "street-ink-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "street-ink-service"
        })),
    }
}

/// GET /api/v1/health/ready
pub async fn readiness(state: web::Data<HealthState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.check_postgres().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let postgres = match result {
        Ok(_) => ComponentCheck {
            healthy: true,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms,
        },
        Err(e) => ComponentCheck {
            healthy: false,
            message: format!("PostgreSQL connection failed: {}", e),
            latency_ms,
        },
    };

    let response = ReadinessResponse {
        ready: postgres.healthy,
        postgres,
        timestamp: Utc::now().to_rfc3339(),
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// GET /api/v1/health/live
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
