//! 学科实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::{CurriculumType, LevelType};

/// 学科
///
/// JSON 字段名沿用前端既有约定：`short_tag`、`curriculum_type` 为下划线，
/// 时间戳为 `createdAt`/`updatedAt`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub short_tag: String,
    pub code: String,
    pub description: Option<String>,
    pub curriculum_type: Option<CurriculumType>,
    pub category: String,
    pub level: Option<LevelType>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// 待插入的学科
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubject {
    pub name: String,
    pub short_tag: String,
    pub code: String,
    pub description: Option<String>,
    pub curriculum_type: Option<CurriculumType>,
    pub category: String,
    pub level: Option<LevelType>,
}

impl NewSubject {
    /// 分配主键和时间戳，生成完整记录
    ///
    /// 主键使用 UUID v7，按时间有序
    pub fn into_subject(self, now: DateTime<Utc>) -> Subject {
        Subject {
            id: uuid::Uuid::now_v7().to_string(),
            name: self.name,
            short_tag: self.short_tag,
            code: self.code,
            description: self.description,
            curriculum_type: self.curriculum_type,
            category: self.category,
            level: self.level,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let subject = NewSubject {
            name: "Mathematics".into(),
            short_tag: "math".into(),
            code: "MATH101".into(),
            description: None,
            curriculum_type: Some(CurriculumType::CompetenceBasedOutcome),
            category: "SCIENCE".into(),
            level: Some(LevelType::Senior),
        }
        .into_subject(Utc::now());

        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["short_tag"], "math");
        assert_eq!(json["curriculum_type"], "COMPETENCE_BASED_OUTCOME");
        assert_eq!(json["level"], "SENIOR");
        assert!(json["description"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_into_subject_assigns_unique_ids() {
        let base = NewSubject {
            name: "Physics".into(),
            short_tag: "physics".into(),
            code: "PHYS".into(),
            description: None,
            curriculum_type: None,
            category: "SCIENCE".into(),
            level: None,
        };
        let now = Utc::now();
        let a = base.clone().into_subject(now);
        let b = base.into_subject(now);

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }
}
