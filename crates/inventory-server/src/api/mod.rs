//! HTTP API: маршрутизация и состояние приложения.

pub mod envelope;
pub mod rate_limit;
pub mod server_routes;

use crate::services::directory_service::ServerDirectory;
use crate::services::server_repo;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use rate_limit::RateLimiter;
use sea_orm::ConnectionTrait;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Общее состояние приложения.
#[derive(Clone)]
pub struct AppState {
    pub directory: ServerDirectory,
    /// `None`: ограничение частоты выключено (по умолчанию).
    pub rate_limiter: Option<RateLimiter>,
}

/// Построить маршрутизатор Axum.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut server_api = server_routes::routes();
    if let Some(limiter) = state.rate_limiter.clone() {
        server_api = server_api.layer(axum::middleware::from_fn(move |req, next| {
            let limiter = limiter.clone();
            rate_limit::rate_limit_middleware(limiter, req, next)
        }));
    }

    Router::new()
        .route("/health", get(health_check))
        .merge(server_api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health: доступность базы и число записей.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db = state.directory.db();
    let db_ok = db.execute_unprepared("SELECT 1").await.is_ok();
    let servers = if db_ok {
        server_repo::count(db).await.ok()
    } else {
        None
    };

    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "error" },
        "database": db_ok,
        "servers": servers,
        "service": "inventory-server"
    }))
}
