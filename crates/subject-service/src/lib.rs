//! 学科服务
//!
//! 为在线教育平台提供学科（Subject）目录的 REST API。
//!
//! ## 核心功能
//!
//! - **学科管理**：学科的列表、详情、创建、合并更新和删除
//! - **唯一性约束**：学科编码（code）与短标签（short_tag）全局唯一
//! - **账号认证**：邮箱密码注册登录，签发 JWT Bearer Token
//! - **角色白名单**：写操作按硬编码的角色列表放行
//!
//! ## 模块结构
//!
//! - `auth`: JWT 与密码处理、管理员初始化
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型与 HTTP 映射
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 会话解析与角色检查
//! - `models`: 实体模型与枚举
//! - `repository`: PostgreSQL / 内存仓储
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据库：SQLx (PostgreSQL)
//! - 数据验证：validator

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use models::{CurriculumType, LevelType, Subject, User, UserRole};
pub use state::AppState;
