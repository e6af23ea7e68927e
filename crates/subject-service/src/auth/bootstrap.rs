//! 管理员初始化
//!
//! 注册接口只产生 GENERAL_USER，配置了引导账号时在启动阶段确保管理员存在

use edumarket_shared::config::AuthConfig;
use tracing::{info, warn};

use super::password::hash_password;
use crate::error::{ApiError, Result};
use crate::models::{User, UserRole, normalize_email};
use crate::state::AppState;

/// 确保引导管理员存在且角色正确
///
/// 未配置邮箱或密码时直接返回。已存在的账号只校正角色，不重置密码。
pub async fn ensure_bootstrap_admin(state: &AppState, config: &AuthConfig) -> Result<()> {
    let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    let role: UserRole = config
        .bootstrap_admin_role
        .parse()
        .map_err(|e| ApiError::Internal(format!("引导管理员角色配置错误: {}", e)))?;

    let email = normalize_email(email);
    if let Some(existing) = state.users.find_by_email(&email).await? {
        if existing.role != role {
            state.users.set_role(&existing.id, role).await?;
            info!(user_id = %existing.id, role = %role, "引导管理员角色已更新");
        }
        return Ok(());
    }

    if password.len() < 8 {
        warn!("引导管理员密码少于 8 位");
    }

    let password_hash = hash_password(password, state.bcrypt_cost)?;
    let user = User::new(&config.bootstrap_admin_name, &email, password_hash, role);
    let user = state.users.insert(&user).await?;

    info!(user_id = %user.id, email = %user.email, role = %role, "引导管理员已创建");
    Ok(())
}
