//! 学科仓储（PostgreSQL）

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::SubjectRepository;
use crate::error::{ApiError, Result};
use crate::models::Subject;

const SUBJECT_COLUMNS: &str = "id, name, short_tag, code, description, curriculum_type, \
                               category, level, created_at, updated_at";

/// 学科仓储
pub struct PgSubjectRepository {
    pool: PgPool,
}

impl PgSubjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Subject>> {
        // column 只来自本模块内的常量
        let sql = format!(
            "SELECT {} FROM subjects WHERE {} = $1 LIMIT 1",
            SUBJECT_COLUMNS, column
        );
        let subject = sqlx::query_as::<_, Subject>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(subject)
    }
}

#[async_trait]
impl SubjectRepository for PgSubjectRepository {
    async fn list(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(&format!(
            "SELECT {} FROM subjects ORDER BY created_at DESC",
            SUBJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subject>> {
        self.find_one("id", id).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.find_one("code", code).await
    }

    async fn find_by_short_tag(&self, short_tag: &str) -> Result<Option<Subject>> {
        self.find_one("short_tag", short_tag).await
    }

    async fn insert(&self, subject: &Subject) -> Result<Subject> {
        let row = sqlx::query_as::<_, Subject>(&format!(
            r#"
            INSERT INTO subjects
                (id, name, short_tag, code, description, curriculum_type,
                 category, level, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            SUBJECT_COLUMNS
        ))
        .bind(&subject.id)
        .bind(&subject.name)
        .bind(&subject.short_tag)
        .bind(&subject.code)
        .bind(&subject.description)
        .bind(subject.curriculum_type)
        .bind(&subject.category)
        .bind(subject.level)
        .bind(subject.created_at)
        .bind(subject.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(ApiError::from_write_error)?;

        Ok(row)
    }

    async fn update(&self, subject: &Subject) -> Result<Subject> {
        let row = sqlx::query_as::<_, Subject>(&format!(
            r#"
            UPDATE subjects
            SET
                name = $2,
                short_tag = $3,
                code = $4,
                description = $5,
                curriculum_type = $6,
                category = $7,
                level = $8,
                updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            SUBJECT_COLUMNS
        ))
        .bind(&subject.id)
        .bind(&subject.name)
        .bind(&subject.short_tag)
        .bind(&subject.code)
        .bind(&subject.description)
        .bind(subject.curriculum_type)
        .bind(&subject.category)
        .bind(subject.level)
        .bind(subject.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(ApiError::from_write_error)?
        .ok_or_else(|| ApiError::SubjectNotFound(subject.id.clone()))?;

        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
