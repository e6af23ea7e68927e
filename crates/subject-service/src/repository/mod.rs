//! 仓储层
//!
//! 提供学科与用户的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 唯一性冲突在仓储层映射为 409，与处理器的预检查使用同一提示语
//! - 定义 trait 接口以支持 mock 测试和内存存储

mod memory;
mod subject_repo;
mod traits;
mod user_repo;

pub use memory::{MemorySubjectRepository, MemoryUserRepository};
pub use subject_repo::PgSubjectRepository;
pub use traits::*;
pub use user_repo::PgUserRepository;
