//! 健康检查处理器

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

const SERVICE_NAME: &str = "subject-service";

/// 存活探针：服务进程正常即返回 ok
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// 就绪探针：检查存储是否可用
///
/// GET /ready
pub async fn readiness_check(State(state): State<AppState>) -> Json<Value> {
    let storage_ok = state.subjects.ping().await.is_ok();

    Json(json!({
        "status": if storage_ok { "ok" } else { "degraded" },
        "service": SERVICE_NAME,
        "checks": {
            "storage": if storage_ok { "ok" } else { "fail" }
        }
    }))
}
