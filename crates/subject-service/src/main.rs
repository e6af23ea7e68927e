//! 学科服务入口
//!
//! 提供学科目录与账号认证的 REST API。

use std::time::Duration;

use anyhow::bail;
use axum::{
    Router, extract::Request, http::HeaderValue, middleware, middleware::Next, response::Response,
};
use edumarket_shared::{
    config::{AppConfig, CorsConfig, StorageBackend},
    database::Database,
    observability,
};
use subject_service::{auth::ensure_bootstrap_admin, routes, state::AppState};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};
use tracing::{info, warn};

const SERVICE_NAME: &str = "subject-service";

/// 单个请求的处理上限
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：default → {env} → subject-service.toml → 环境变量
    let config = AppConfig::load(SERVICE_NAME)?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        storage = ?config.storage.backend,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    // JWT 密钥：生产环境必须显式配置
    if config.auth.uses_default_secret() {
        if config.is_production() {
            bail!("EDUMARKET_AUTH__JWT_SECRET must be set in production environment");
        }
        warn!("Using default JWT secret - set EDUMARKET_AUTH__JWT_SECRET for production");
    }

    let (state, db) = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            if config.database.run_migrations {
                db.run_migrations().await?;
            }
            (AppState::postgres(db.pool().clone(), &config.auth), Some(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage - data is lost on restart");
            (AppState::in_memory(&config.auth), None)
        }
    };

    ensure_bootstrap_admin(&state, &config.auth).await?;

    let app = routes::app(state).layer(
        ServiceBuilder::new()
            .layer(cors_layer(&config.cors, config.is_production()))
            .layer(middleware::from_fn(security_headers))
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
    );

    serve(app, &config.server_addr()).await?;

    if let Some(db) = db {
        db.close().await;
    }
    info!("Server shutdown complete");

    Ok(())
}

async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    // 优雅关闭：停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// CORS 配置："*" 允许全部来源，否则按逗号分隔的白名单
fn cors_layer(config: &CorsConfig, production: bool) -> CorsLayer {
    if config.allows_any() {
        if production {
            warn!("cors.allowed_origins = \"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", config.allowed_origins);
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 为所有响应注入 HTTP 安全头
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert("x-xss-protection", HeaderValue::from_static("0"));
    response
}

/// 监听关闭信号
///
/// 容器通过 SIGTERM 通知停止；本地开发通过 Ctrl+C。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
