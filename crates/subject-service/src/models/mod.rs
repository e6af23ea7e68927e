//! 实体模型

mod enums;
mod subject;
mod user;

pub use enums::{CurriculumType, LevelType, ParseEnumError, UserRole, is_valid_user_role};
pub use subject::{NewSubject, Subject};
pub use user::{User, UserDto, normalize_email};
