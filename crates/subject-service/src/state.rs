//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use edumarket_shared::config::AuthConfig;
use sqlx::PgPool;
use std::sync::{Arc, OnceLock};

use crate::auth::{JwtConfig, JwtManager, hash_password};
use crate::error::Result;
use crate::repository::{
    MemorySubjectRepository, MemoryUserRepository, PgSubjectRepository, PgUserRepository,
    SubjectRepository, UserRepository,
};

/// Axum 应用共享状态
///
/// 仓储以 trait 对象持有，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    pub subjects: Arc<dyn SubjectRepository>,
    pub users: Arc<dyn UserRepository>,
    /// JWT 签发与校验
    pub jwt_manager: Arc<JwtManager>,
    /// bcrypt 哈希成本
    pub bcrypt_cost: u32,
    /// 未知邮箱登录时用于比对的占位哈希，首次使用时生成
    pub(crate) dummy_hash: Arc<OnceLock<String>>,
}

impl AppState {
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        users: Arc<dyn UserRepository>,
        auth: &AuthConfig,
    ) -> Self {
        Self {
            subjects,
            users,
            jwt_manager: Arc::new(JwtManager::new(JwtConfig::from(auth))),
            bcrypt_cost: auth.bcrypt_cost,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// 与真实用户同成本的占位哈希
    pub fn dummy_password_hash(&self) -> Result<&str> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash);
        }
        let hash = hash_password(&uuid::Uuid::new_v4().to_string(), self.bcrypt_cost)?;
        Ok(self.dummy_hash.get_or_init(|| hash))
    }

    /// PostgreSQL 存储
    pub fn postgres(pool: PgPool, auth: &AuthConfig) -> Self {
        Self::new(
            Arc::new(PgSubjectRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
            auth,
        )
    }

    /// 内存存储，进程退出即丢失
    pub fn in_memory(auth: &AuthConfig) -> Self {
        Self::new(
            Arc::new(MemorySubjectRepository::new()),
            Arc::new(MemoryUserRepository::new()),
            auth,
        )
    }
}
