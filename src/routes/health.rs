use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "SafeGuard API is running",
                "database": "connected",
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "SafeGuard API is running",
                    "database": "disconnected",
                })),
            )
        }
    }
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "SafeGuard API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "parents": "/api/parents",
            "register": "POST /api/parents/register",
            "login": "POST /api/parents/login",
            "children": "/api/children",
            "connect": "POST /api/children/connect",
            "incidents": "/api/incidents",
        },
    }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Endpoint not found" })),
    )
}
