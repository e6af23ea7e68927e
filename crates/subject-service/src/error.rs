//! 服务错误类型定义
//!
//! 错误到 HTTP 的映射集中在此：状态码 + `{"error": ..., "details"?: ...}` 响应体

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// 学科编码冲突
pub const CODE_EXISTS: &str = "Subject code already exists";
/// 学科短标签冲突
pub const SHORT_TAG_EXISTS: &str = "Subject short tag already exists";
/// 邮箱已注册
pub const EMAIL_EXISTS: &str = "Email is already registered";

/// PostgreSQL 唯一约束冲突错误码
const PG_UNIQUE_VIOLATION: &str = "23505";

/// 系统级错误对外统一提示
const INTERNAL_MESSAGE: &str = "Internal server error";

/// 服务错误类型
///
/// Display 输出即响应体中的 `error` 字段
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid email or password")]
    InvalidCredentials,

    // 请求错误
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid request body")]
    InvalidBody(String),

    // 资源不存在
    #[error("Subject not found")]
    SubjectNotFound(String),
    #[error("User not found")]
    UserNotFound(String),

    // 唯一性冲突
    #[error("{0}")]
    Conflict(String),

    // 系统错误
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MissingFields(_) | Self::Validation(_) | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::SubjectNotFound(_) | Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 响应体中的 `details` 字段
    pub fn details(&self) -> Option<String> {
        match self {
            Self::MissingFields(fields) => Some(format!("{} are required", fields.join(", "))),
            Self::InvalidBody(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    /// 将写入时的唯一约束冲突映射为 409
    ///
    /// 预检查与插入之间存在竞争窗口，并发写入时由数据库唯一索引兜底。
    /// 依据约束名区分冲突字段（short_tag_idx / code_idx / users_email_idx）。
    pub fn from_write_error(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or_default();
                if constraint.contains("short_tag") {
                    return Self::Conflict(SHORT_TAG_EXISTS.to_string());
                }
                if constraint.contains("code") {
                    return Self::Conflict(CODE_EXISTS.to_string());
                }
                if constraint.contains("email") {
                    return Self::Conflict(EMAIL_EXISTS.to_string());
                }
            }
        }
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                INTERNAL_MESSAGE.to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        let body = match self.details() {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
///
/// 按字段名排序后拼接各字段的提示语，保证输出稳定
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();

        Self::Validation(messages.join("; "))
    }
}

/// 请求体 JSON 解析失败
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
