//! 请求 DTO 定义
//!
//! 学科接口沿用前端既有的下划线字段名（`short_tag`、`curriculum_type`）

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use validator::Validate;

use crate::error::{ApiError, Result};
use crate::models::{CurriculumType, LevelType, NewSubject, Subject};

/// 学科编码：仅字母和数字
pub static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("编码正则无效"));

/// 短标签：字母、数字和下划线
pub static SHORT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("短标签正则无效"));

pub const CODE_FORMAT_MESSAGE: &str =
    "Subject code must be alphanumeric (letters and numbers only)";
pub const SHORT_TAG_FORMAT_MESSAGE: &str =
    "Short tag must contain only letters, numbers, and underscores";

const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

/// 空字符串视为未填写（表单下拉框的空选项）
fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

/// 三态字段：缺省 → None（保持），null 或空串 → Some(None)（清空），有值 → Some(Some(v))
///
/// 需配合 `#[serde(default)]`，字段缺省时不会调用本函数
fn patch_field<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    empty_as_none(deserializer).map(Some)
}

/// 编码的格式与长度问题
fn code_error(code: &str) -> Option<&'static str> {
    if !CODE_REGEX.is_match(code) {
        Some(CODE_FORMAT_MESSAGE)
    } else if code.chars().count() > 10 {
        Some("Subject code must be at most 10 characters")
    } else {
        None
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// 创建学科请求
///
/// 必填字段以 Option 接收，以便缺失时一次性报告全部字段
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(max = 100, message = "Subject name must be at most 100 characters"))]
    pub name: Option<String>,
    #[validate(
        regex(
            path = *SHORT_TAG_REGEX,
            message = "Short tag must contain only letters, numbers, and underscores"
        ),
        length(max = 20, message = "Short tag must be at most 20 characters")
    )]
    pub short_tag: Option<String>,
    #[validate(
        regex(
            path = *CODE_REGEX,
            message = "Subject code must be alphanumeric (letters and numbers only)"
        ),
        length(max = 10, message = "Subject code must be at most 10 characters")
    )]
    pub code: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub curriculum_type: Option<CurriculumType>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub level: Option<LevelType>,
}

impl CreateSubjectRequest {
    /// 缺失或为空的必填字段，按 name、short_tag、code、category 顺序
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("short_tag", &self.short_tag),
            ("code", &self.code),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| field)
        .collect()
    }

    /// 查重之前的校验：必填字段与编码格式
    ///
    /// 通过后返回待查重的编码与短标签；短标签格式等其余校验在查重之后进行
    pub fn check_identity(&self) -> Result<(&str, &str)> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let code = self.code.as_deref().unwrap_or_default();
        if let Some(message) = code_error(code) {
            return Err(ApiError::Validation(message.to_string()));
        }

        Ok((code, self.short_tag.as_deref().unwrap_or_default()))
    }

    /// 校验必填与格式，转换为待插入记录
    pub fn into_new_subject(self) -> Result<NewSubject> {
        self.check_identity()?;
        self.validate()?;

        Ok(NewSubject {
            name: self.name.unwrap_or_default(),
            short_tag: self.short_tag.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            description: self.description,
            curriculum_type: self.curriculum_type,
            category: self.category.unwrap_or_default(),
            level: self.level,
        })
    }
}

/// 更新学科请求（合并语义）
///
/// - `name`、`category`：缺省或空串保持原值
/// - `short_tag`、`code`：缺省或 null 保持原值
/// - `description`、`curriculum_type`、`level`：缺省保持，null 清空，有值替换
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub short_tag: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub curriculum_type: Option<Option<CurriculumType>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub level: Option<Option<LevelType>>,
}

impl UpdateSubjectRequest {
    /// 与现有值不同的新编码
    pub fn changed_code<'a>(&'a self, existing: &Subject) -> Option<&'a str> {
        self.code.as_deref().filter(|code| *code != existing.code)
    }

    /// 与现有值不同的新短标签
    pub fn changed_short_tag<'a>(&'a self, existing: &Subject) -> Option<&'a str> {
        self.short_tag
            .as_deref()
            .filter(|short_tag| *short_tag != existing.short_tag)
    }

    /// 校验变更字段的格式与长度
    pub fn validate_against(&self, existing: &Subject) -> Result<()> {
        let mut messages = Vec::new();

        if let Some(message) = self.changed_code(existing).and_then(code_error) {
            messages.push(message.to_string());
        }
        if let Some(name) = self.name.as_deref() {
            if name.chars().count() > NAME_MAX {
                messages.push("Subject name must be at most 100 characters".to_string());
            }
        }
        if let Some(short_tag) = self.changed_short_tag(existing) {
            if !SHORT_TAG_REGEX.is_match(short_tag) {
                messages.push(SHORT_TAG_FORMAT_MESSAGE.to_string());
            } else if short_tag.chars().count() > 20 {
                messages.push("Short tag must be at most 20 characters".to_string());
            }
        }
        if let Some(Some(description)) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX {
                messages.push("Description must be at most 500 characters".to_string());
            }
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(messages.join("; ")))
        }
    }

    /// 合并到现有记录，刷新 updatedAt
    pub fn apply(self, existing: &Subject, now: DateTime<Utc>) -> Subject {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        Subject {
            id: existing.id.clone(),
            name: non_empty(self.name).unwrap_or_else(|| existing.name.clone()),
            short_tag: self.short_tag.unwrap_or_else(|| existing.short_tag.clone()),
            code: self.code.unwrap_or_else(|| existing.code.clone()),
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            curriculum_type: self.curriculum_type.unwrap_or(existing.curriculum_type),
            category: non_empty(self.category).unwrap_or_else(|| existing.category.clone()),
            level: self.level.unwrap_or(existing.level),
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
