//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use edumarket_shared::observability::middleware as obs_middleware;

use crate::{
    handlers,
    middleware::{
        CREATE_SUBJECT, DELETE_SUBJECT, UPDATE_SUBJECT, require_roles, session_middleware,
    },
    state::AppState,
};

/// 认证路由（公开）
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(handlers::auth::sign_up))
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/session", get(handlers::auth::get_session))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
}

/// 学科路由
///
/// 读接口公开；写接口在路由层做角色检查，先于请求体解析执行
pub fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(handlers::subject::list_subjects))
        .route(
            "/subjects",
            post(handlers::subject::create_subject)
                .layer(middleware::from_fn(require_roles(&CREATE_SUBJECT))),
        )
        .route("/subjects/{id}", get(handlers::subject::get_subject))
        .route(
            "/subjects/{id}",
            put(handlers::subject::update_subject)
                .layer(middleware::from_fn(require_roles(&UPDATE_SUBJECT))),
        )
        .route(
            "/subjects/{id}",
            delete(handlers::subject::delete_subject)
                .layer(middleware::from_fn(require_roles(&DELETE_SUBJECT))),
        )
}

/// 构建 /api 下的全部路由
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(subject_routes())
}

/// 构建完整应用
///
/// 包含健康检查、会话解析与请求追踪；CORS 和安全头由入口按部署配置追加
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // 会话中间件：解析 Bearer Token，无效 Token 视为匿名
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
