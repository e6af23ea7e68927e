//! 内存仓储
//!
//! 使用 DashMap 实现，适用于本地开发（storage.backend = "memory"）和测试。
//! 唯一性检查与写入不是原子的，不提供数据库级别的并发保证。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::traits::{SubjectRepository, UserRepository};
use crate::error::{ApiError, CODE_EXISTS, EMAIL_EXISTS, Result, SHORT_TAG_EXISTS};
use crate::models::{Subject, User, UserRole};

/// 内存学科仓储
#[derive(Debug, Default, Clone)]
pub struct MemorySubjectRepository {
    data: Arc<DashMap<String, Subject>>,
}

impl MemorySubjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by<F>(&self, predicate: F) -> Option<Subject>
    where
        F: Fn(&Subject) -> bool,
    {
        self.data
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    /// 除 `id` 之外是否有记录满足条件
    fn taken_by_other<F>(&self, id: &str, predicate: F) -> bool
    where
        F: Fn(&Subject) -> bool,
    {
        self.data
            .iter()
            .any(|entry| entry.key() != id && predicate(entry.value()))
    }

    /// 模拟 short_tag_idx / code_idx 唯一索引
    fn check_unique(&self, subject: &Subject) -> Result<()> {
        if self.taken_by_other(&subject.id, |s| s.short_tag == subject.short_tag) {
            return Err(ApiError::Conflict(SHORT_TAG_EXISTS.to_string()));
        }
        if self.taken_by_other(&subject.id, |s| s.code == subject.code) {
            return Err(ApiError::Conflict(CODE_EXISTS.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for MemorySubjectRepository {
    async fn list(&self) -> Result<Vec<Subject>> {
        let mut subjects: Vec<Subject> = self.data.iter().map(|e| e.value().clone()).collect();
        // 同一时间戳下按 id 倒序，v7 id 与插入顺序一致
        subjects.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(subjects)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subject>> {
        Ok(self.data.get(id).map(|v| v.clone()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Subject>> {
        Ok(self.find_by(|s| s.code == code))
    }

    async fn find_by_short_tag(&self, short_tag: &str) -> Result<Option<Subject>> {
        Ok(self.find_by(|s| s.short_tag == short_tag))
    }

    async fn insert(&self, subject: &Subject) -> Result<Subject> {
        self.check_unique(subject)?;
        self.data.insert(subject.id.clone(), subject.clone());
        Ok(subject.clone())
    }

    async fn update(&self, subject: &Subject) -> Result<Subject> {
        self.check_unique(subject)?;
        let mut entry = self
            .data
            .get_mut(&subject.id)
            .ok_or_else(|| ApiError::SubjectNotFound(subject.id.clone()))?;

        let created_at = entry.created_at;
        *entry = Subject {
            created_at,
            ..subject.clone()
        };
        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.data.remove(id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// 内存用户仓储
#[derive(Debug, Default, Clone)]
pub struct MemoryUserRepository {
    data: Arc<DashMap<String, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .data
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.data.get(id).map(|v| v.clone()))
    }

    async fn insert(&self, user: &User) -> Result<User> {
        if self.data.iter().any(|entry| entry.value().email == user.email) {
            return Err(ApiError::Conflict(EMAIL_EXISTS.to_string()));
        }
        self.data.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn set_role(&self, id: &str, role: UserRole) -> Result<()> {
        let mut user = self
            .data
            .get_mut(id)
            .ok_or_else(|| ApiError::UserNotFound(id.to_string()))?;
        user.role = role;
        user.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSubject;
    use chrono::{Duration, Utc};

    fn subject(code: &str, short_tag: &str) -> Subject {
        NewSubject {
            name: format!("Subject {code}"),
            short_tag: short_tag.into(),
            code: code.into(),
            description: None,
            curriculum_type: None,
            category: "SCIENCE".into(),
            level: None,
        }
        .into_subject(Utc::now())
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_code_and_short_tag() {
        let repo = MemorySubjectRepository::new();
        repo.insert(&subject("MATH", "math")).await.unwrap();

        let dup_code = repo.insert(&subject("MATH", "other")).await.unwrap_err();
        assert!(matches!(dup_code, ApiError::Conflict(ref m) if m == CODE_EXISTS));

        let dup_tag = repo.insert(&subject("PHYS", "math")).await.unwrap_err();
        assert!(matches!(dup_tag, ApiError::Conflict(ref m) if m == SHORT_TAG_EXISTS));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_allows_own_values() {
        let repo = MemorySubjectRepository::new();
        let original = repo.insert(&subject("MATH", "math")).await.unwrap();

        let changed = Subject {
            name: "Maths".into(),
            created_at: original.created_at + Duration::days(1),
            ..original.clone()
        };
        let updated = repo.update(&changed).await.unwrap();

        assert_eq!(updated.name, "Maths");
        assert_eq!(updated.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = MemorySubjectRepository::new();
        let mut older = subject("OLD", "old");
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert(&older).await.unwrap();
        repo.insert(&subject("NEW", "new")).await.unwrap();

        let codes: Vec<_> = repo.list().await.unwrap().into_iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["NEW", "OLD"]);
    }

    #[tokio::test]
    async fn test_delete_reports_missing() {
        let repo = MemorySubjectRepository::new();
        let s = repo.insert(&subject("MATH", "math")).await.unwrap();

        assert!(repo.delete(&s.id).await.unwrap());
        assert!(!repo.delete(&s.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_email_unique_and_set_role() {
        let repo = MemoryUserRepository::new();
        let user = User::new("Ada", "ada@example.com", "h".into(), UserRole::GeneralUser);
        repo.insert(&user).await.unwrap();

        let dup = User::new("Ada 2", "ada@example.com", "h".into(), UserRole::GeneralUser);
        assert!(matches!(repo.insert(&dup).await, Err(ApiError::Conflict(_))));

        repo.set_role(&user.id, UserRole::Admin).await.unwrap();
        let stored = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.role, UserRole::Admin);

        assert!(matches!(
            repo.set_role("missing", UserRole::Admin).await,
            Err(ApiError::UserNotFound(_))
        ));
    }
}
