//! 会话中间件
//!
//! 解析 Bearer Token 并将 Claims 注入请求扩展

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::AppState;

/// 从 Authorization 头中取出 Bearer Token
pub fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 会话中间件
///
/// Token 有效且用户仍存在时注入 Claims，角色以存储中的当前值为准；
/// 缺失、无效或用户已删除时按匿名请求放行，是否要求登录由路由上的角色检查决定。
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let claims = bearer_token(&request).and_then(|token| {
        state
            .jwt_manager
            .verify_token(token)
            .inspect_err(|e| debug!(error = %e, "忽略无效 Token"))
            .ok()
    });

    if let Some(mut claims) = claims {
        match state.users.find_by_id(&claims.sub).await {
            Ok(Some(user)) => {
                claims.role = user.role.as_str().to_string();
                request.extensions_mut().insert(claims);
            }
            Ok(None) => debug!(user_id = %claims.sub, "Token 对应的用户已不存在"),
            Err(e) => return e.into_response(),
        }
    }

    next.run(request).await
}
