//! 枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，数据库中以 varchar 存储

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 枚举解析失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无效的{kind}取值: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// 为枚举生成 as_str / FromStr / Display / ALL
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// 全部取值，按声明顺序
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// 数据库与 JSON 中的字符串形式
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SystemAdmin,
    SystemSuperAdmin,
    SystemDeveloper,
    CustomerRelation,
    Student,
    Teacher,
    EducationResearcher,
    Guest,
    ContentCreator,
    /// 注册用户的默认角色
    #[default]
    GeneralUser,
    Lecturer,
    Other,
    /// 学科修改/删除的白名单角色
    Admin,
}

string_enum!(UserRole, "角色", {
    SystemAdmin => "SYSTEM_ADMIN",
    SystemSuperAdmin => "SYSTEM_SUPER_ADMIN",
    SystemDeveloper => "SYSTEM_DEVELOPER",
    CustomerRelation => "CUSTOMER_RELATION",
    Student => "STUDENT",
    Teacher => "TEACHER",
    EducationResearcher => "EDUCATION_RESEARCHER",
    Guest => "GUEST",
    ContentCreator => "CONTENT_CREATOR",
    GeneralUser => "GENERAL_USER",
    Lecturer => "LECTURER",
    Other => "OTHER",
    Admin => "ADMIN",
});

impl UserRole {
    /// 系统运维类角色
    pub fn is_system_role(&self) -> bool {
        matches!(
            self,
            Self::SystemAdmin | Self::SystemSuperAdmin | Self::SystemDeveloper | Self::CustomerRelation
        )
    }

    pub fn is_teacher_role(&self) -> bool {
        matches!(self, Self::Teacher)
    }

    pub fn is_student_role(&self) -> bool {
        matches!(self, Self::Student)
    }
}

/// 角色字符串是否为已知角色
pub fn is_valid_user_role(role: &str) -> bool {
    role.parse::<UserRole>().is_ok()
}

/// 学段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelType {
    Primary,
    Junior,
    Senior,
    College,
    Skills,
}

string_enum!(LevelType, "学段", {
    Primary => "PRIMARY",
    Junior => "JUNIOR",
    Senior => "SENIOR",
    College => "COLLEGE",
    Skills => "SKILLS",
});

impl LevelType {
    /// 前端展示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Junior => "Junior",
            Self::Senior => "Senior",
            Self::College => "College",
            Self::Skills => "Skills",
        }
    }
}

/// 课程体系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurriculumType {
    /// 能力本位
    CompetenceBasedOutcome,
    /// 目标本位
    ObjectiveBasedOutcome,
}

string_enum!(CurriculumType, "课程体系", {
    CompetenceBasedOutcome => "COMPETENCE_BASED_OUTCOME",
    ObjectiveBasedOutcome => "OBJECTIVE_BASED_OUTCOME",
});

impl CurriculumType {
    /// 前端展示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CompetenceBasedOutcome => "Competence Based Outcome",
            Self::ObjectiveBasedOutcome => "Objective Based Outcome",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert_eq!(UserRole::ALL.len(), 13);
    }

    #[test]
    fn test_serde_matches_as_str() {
        // serde 与 sqlx 的重命名规则必须和 as_str 一致，否则 JWT 中的角色与数据库不符
        for role in UserRole::ALL {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        for level in LevelType::ALL {
            let json = serde_json::to_string(level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
        }
        for ct in CurriculumType::ALL {
            let json = serde_json::to_string(ct).unwrap();
            assert_eq!(json, format!("\"{}\"", ct.as_str()));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_and_lowercase() {
        let err = "admin".parse::<UserRole>().unwrap_err();
        assert_eq!(err.value, "admin");
        assert!("UNIVERSITY".parse::<LevelType>().is_err());
        assert!(!is_valid_user_role("ROOT"));
        assert!(is_valid_user_role("LECTURER"));
    }

    #[test]
    fn test_role_groups() {
        assert!(UserRole::SystemAdmin.is_system_role());
        assert!(UserRole::CustomerRelation.is_system_role());
        assert!(!UserRole::Admin.is_system_role());
        assert!(UserRole::Teacher.is_teacher_role());
        assert!(UserRole::Student.is_student_role());
        assert_eq!(UserRole::default(), UserRole::GeneralUser);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(LevelType::College.display_name(), "College");
        assert_eq!(
            CurriculumType::CompetenceBasedOutcome.display_name(),
            "Competence Based Outcome"
        );
        assert_eq!(CurriculumType::ObjectiveBasedOutcome.to_string(), "OBJECTIVE_BASED_OUTCOME");
    }
}
