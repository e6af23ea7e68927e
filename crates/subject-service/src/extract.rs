//! 自定义提取器

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON 请求体提取器
///
/// 与 `axum::Json` 相同，解析失败时返回 `{"error": "Invalid request body", "details": ...}`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
