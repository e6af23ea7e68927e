//! 中间件模块
//!
//! 提供会话解析和角色检查中间件

mod permission;
mod session;

pub use permission::{CREATE_SUBJECT, DELETE_SUBJECT, RoleGate, UPDATE_SUBJECT, require_roles};
pub use session::{bearer_token, session_middleware};
