//! 路由装配与健康检查

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::dto::HealthData;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::{auth_routes, post_routes, story_routes};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes::routes())
        .merge(post_routes::routes())
        .merge(story_routes::routes())
}

/// 存活探测 + 后端存储可达性
async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthData>>) {
    let database_ok = state.store.ping().await;

    let data = HealthData {
        status: if database_ok { "healthy" } else { "unhealthy" },
        database: if database_ok { "connected" } else { "disconnected" },
        version: env!("CARGO_PKG_VERSION"),
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse {
            success: database_ok,
            message: "health check completed".to_string(),
            data: Some(data),
            errors: None,
        }),
    )
}
