//! 角色检查中间件
//!
//! 按硬编码的角色白名单放行学科写操作

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;

use crate::auth::Claims;
use crate::error::ApiError;

/// 角色白名单
#[derive(Debug)]
pub struct RoleGate {
    /// 允许的角色字符串
    pub roles: &'static [&'static str],
    /// 角色不在白名单时的 403 提示语
    pub denied_message: &'static str,
}

impl RoleGate {
    pub fn allows(&self, role: &str) -> bool {
        self.roles.contains(&role)
    }
}

/// 创建学科
pub static CREATE_SUBJECT: RoleGate = RoleGate {
    roles: &[
        "SYSTEM_ADMIN",
        "SYSTEM_SUPER_ADMIN",
        "SYSTEM_DEVELOPER",
        "TEACHER",
        "LECTURER",
    ],
    denied_message: "Insufficient permissions",
};

/// 修改学科
pub static UPDATE_SUBJECT: RoleGate = RoleGate {
    roles: &["ADMIN", "TEACHER"],
    denied_message: "Insufficient permissions",
};

/// 删除学科
pub static DELETE_SUBJECT: RoleGate = RoleGate {
    roles: &["ADMIN"],
    denied_message: "Only admins can delete subjects",
};

/// 角色检查中间件工厂
///
/// 依赖 session 中间件注入的 Claims：无会话返回 401，角色不在白名单返回 403。
/// 作为路由层挂载，先于请求体解析执行。
///
/// # 示例
/// ```ignore
/// .route("/subjects", post(create_subject).layer(axum::middleware::from_fn(require_roles(&CREATE_SUBJECT))))
/// ```
pub fn require_roles(
    gate: &'static RoleGate,
) -> impl Fn(Request<Body>, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone + Send
{
    move |request: Request<Body>, next: Next| Box::pin(check_roles(request, next, gate))
}

async fn check_roles(request: Request<Body>, next: Next, gate: &'static RoleGate) -> Response {
    let Some(claims) = request.extensions().get::<Claims>() else {
        return ApiError::unauthorized().into_response();
    };

    if !gate.allows(&claims.role) {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "角色无权执行该操作");
        return ApiError::Forbidden(gate.denied_message.to_string()).into_response();
    }

    next.run(request).await
}
