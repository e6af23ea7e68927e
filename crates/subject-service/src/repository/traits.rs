//! 仓储 Trait 定义
//!
//! 处理器依赖抽象而非具体实现，支持 PostgreSQL、内存存储与 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Subject, User, UserRole};

/// 学科仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// 按创建时间倒序列出全部学科
    async fn list(&self) -> Result<Vec<Subject>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Subject>>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Subject>>;
    async fn find_by_short_tag(&self, short_tag: &str) -> Result<Option<Subject>>;
    /// 插入学科，唯一约束冲突返回 409
    async fn insert(&self, subject: &Subject) -> Result<Subject>;
    /// 覆盖写入除 id、created_at 外的所有字段
    async fn update(&self, subject: &Subject) -> Result<Subject>;
    /// 返回是否有记录被删除
    async fn delete(&self, id: &str) -> Result<bool>;
    /// 存储可用性检查
    async fn ping(&self) -> Result<()>;
}

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    /// 插入用户，邮箱冲突返回 409
    async fn insert(&self, user: &User) -> Result<User>;
    async fn set_role(&self, id: &str, role: UserRole) -> Result<()>;
}
