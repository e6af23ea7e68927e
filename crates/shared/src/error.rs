//! 统一错误处理模块
//!
//! 基础设施层（数据库连接、迁移、可观测性初始化）共享的错误类型。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("日志初始化失败: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    #[error("指标导出器初始化失败: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 共享库 Result 类型别名
pub type Result<T> = std::result::Result<T, SharedError>;
