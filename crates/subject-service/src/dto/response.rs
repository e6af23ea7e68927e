//! 响应 DTO 定义
//!
//! 学科接口直接返回 `Subject`，这里只定义认证与通用响应体

use serde::Serialize;

use crate::models::UserDto;

/// 注册/登录响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    /// 过期时间（Unix 秒）
    pub expires_at: i64,
    pub user: UserDto,
}

/// 当前会话
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserDto,
    pub expires_at: i64,
}

/// 仅含提示语的响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 登出响应
#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub success: bool,
}
