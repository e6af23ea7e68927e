//! 学科管理 API 处理器
//!
//! 实现学科的 CRUD 操作。写操作的角色检查由路由上的 `require_roles` 完成，
//! 处理器通过 `Claims` 取得操作者信息用于日志。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use edumarket_shared::observability::metrics::record_subject_mutation;
use tracing::info;

use crate::{
    auth::Claims,
    dto::{CreateSubjectRequest, MessageResponse, UpdateSubjectRequest},
    error::{ApiError, CODE_EXISTS, Result, SHORT_TAG_EXISTS},
    extract::ApiJson,
    models::Subject,
    state::AppState,
};

/// 获取学科列表（按创建时间倒序）
///
/// GET /api/subjects
pub async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>> {
    let subjects = state.subjects.list().await?;
    Ok(Json(subjects))
}

/// 获取学科详情
///
/// GET /api/subjects/{id}
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>> {
    let subject = state
        .subjects
        .find_by_id(&id)
        .await?
        .ok_or(ApiError::SubjectNotFound(id))?;

    Ok(Json(subject))
}

/// 创建学科
///
/// POST /api/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    claims: Claims,
    ApiJson(req): ApiJson<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>)> {
    // 顺序：必填与编码格式 → 编码查重 → 短标签查重 → 其余格式与长度
    let (code, short_tag) = req.check_identity()?;

    if state.subjects.find_by_code(code).await?.is_some() {
        return Err(ApiError::Conflict(CODE_EXISTS.to_string()));
    }

    if state.subjects.find_by_short_tag(short_tag).await?.is_some() {
        return Err(ApiError::Conflict(SHORT_TAG_EXISTS.to_string()));
    }

    let new_subject = req.into_new_subject()?;

    let subject = state
        .subjects
        .insert(&new_subject.into_subject(Utc::now()))
        .await?;

    record_subject_mutation("create");
    info!(
        subject_id = %subject.id,
        code = %subject.code,
        user_id = %claims.sub,
        "Subject created"
    );

    Ok((StatusCode::CREATED, Json(subject)))
}

/// 更新学科（合并语义）
///
/// PUT /api/subjects/{id}
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    ApiJson(req): ApiJson<UpdateSubjectRequest>,
) -> Result<Json<Subject>> {
    let existing = state
        .subjects
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::SubjectNotFound(id.clone()))?;

    req.validate_against(&existing)?;

    if let Some(code) = req.changed_code(&existing) {
        let taken = state.subjects.find_by_code(code).await?;
        if taken.is_some_and(|other| other.id != id) {
            return Err(ApiError::Conflict("Subject code must be unique".to_string()));
        }
    }

    if let Some(short_tag) = req.changed_short_tag(&existing) {
        let taken = state.subjects.find_by_short_tag(short_tag).await?;
        if taken.is_some_and(|other| other.id != id) {
            return Err(ApiError::Conflict(
                "Subject short tag must be unique".to_string(),
            ));
        }
    }

    let merged = req.apply(&existing, Utc::now());
    let subject = state.subjects.update(&merged).await?;

    record_subject_mutation("update");
    info!(subject_id = %subject.id, user_id = %claims.sub, "Subject updated");

    Ok(Json(subject))
}

/// 删除学科
///
/// DELETE /api/subjects/{id}
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
) -> Result<Json<MessageResponse>> {
    if state.subjects.find_by_id(&id).await?.is_none() {
        return Err(ApiError::SubjectNotFound(id));
    }

    // 检查与删除之间被并发删除时同样返回 404
    if !state.subjects.delete(&id).await? {
        return Err(ApiError::SubjectNotFound(id));
    }

    record_subject_mutation("delete");
    info!(subject_id = %id, user_id = %claims.sub, "Subject deleted");

    Ok(Json(MessageResponse::new("Subject deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSubject;
    use crate::repository::{MockSubjectRepository, MockUserRepository};
    use edumarket_shared::config::AuthConfig;
    use std::sync::Arc;

    fn state_with(subjects: MockSubjectRepository) -> AppState {
        AppState::new(
            Arc::new(subjects),
            Arc::new(MockUserRepository::new()),
            &AuthConfig::default(),
        )
    }

    fn teacher() -> Claims {
        Claims {
            sub: "teacher-1".into(),
            email: "t@example.com".into(),
            name: "T".into(),
            role: "TEACHER".into(),
            iat: 0,
            exp: i64::MAX,
            iss: "edumarket".into(),
        }
    }

    fn math() -> Subject {
        NewSubject {
            name: "Mathematics".into(),
            short_tag: "math".into(),
            code: "MATH".into(),
            description: None,
            curriculum_type: None,
            category: "SCIENCE".into(),
            level: None,
        }
        .into_subject(Utc::now())
    }

    fn create_request() -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: Some("Physics".into()),
            short_tag: Some("physics".into()),
            code: Some("PHYS".into()),
            category: Some("SCIENCE".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_database_error_is_500() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_list()
            .returning(|| Err(ApiError::Database(sqlx::Error::PoolTimedOut)));

        let err = list_subjects(State(state_with(repo))).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_checks_code_before_short_tag() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(Some(math())));
        repo.expect_find_by_short_tag().never();
        repo.expect_insert().never();

        let err = create_subject(State(state_with(repo)), teacher(), ApiJson(create_request()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == CODE_EXISTS));
    }

    #[tokio::test]
    async fn test_create_code_conflict_wins_over_short_tag_format() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(Some(math())));
        repo.expect_insert().never();

        let req = CreateSubjectRequest {
            short_tag: Some("bad tag".into()),
            ..create_request()
        };
        let err = create_subject(State(state_with(repo)), teacher(), ApiJson(req))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == CODE_EXISTS));
    }

    #[tokio::test]
    async fn test_create_short_tag_format_checked_after_lookups() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_find_by_short_tag().times(1).returning(|_| Ok(None));
        repo.expect_insert().never();

        let req = CreateSubjectRequest {
            short_tag: Some("bad tag".into()),
            ..create_request()
        };
        let err = create_subject(State(state_with(repo)), teacher(), ApiJson(req))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_validation_skips_repository() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_code().never();

        let req = CreateSubjectRequest {
            code: Some("PH-YS".into()),
            ..create_request()
        };
        let err = create_subject(State(state_with(repo)), teacher(), ApiJson(req))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_insert_race_maps_to_conflict() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_find_by_short_tag().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(ApiError::Conflict(SHORT_TAG_EXISTS.to_string())));

        let err = create_subject(State(state_with(repo)), teacher(), ApiJson(create_request()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_find_by_short_tag().returning(|_| Ok(None));
        repo.expect_insert().returning(|s| Ok(s.clone()));

        let (status, Json(subject)) =
            create_subject(State(state_with(repo)), teacher(), ApiJson(create_request()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(subject.code, "PHYS");
        assert_eq!(subject.created_at, subject.updated_at);
    }

    #[tokio::test]
    async fn test_update_unchanged_code_skips_uniqueness_lookup() {
        let existing = math();
        let id = existing.id.clone();

        let mut repo = MockSubjectRepository::new();
        let found = existing.clone();
        repo.expect_find_by_id().returning(move |_| Ok(Some(found.clone())));
        repo.expect_find_by_code().never();
        repo.expect_find_by_short_tag().never();
        repo.expect_update().returning(|s| Ok(s.clone()));

        let req = UpdateSubjectRequest {
            code: Some("MATH".into()),
            name: Some("Maths".into()),
            ..Default::default()
        };
        let Json(updated) =
            update_subject(State(state_with(repo)), Path(id), teacher(), ApiJson(req))
                .await
                .unwrap();
        assert_eq!(updated.name, "Maths");
        assert_eq!(updated.code, "MATH");
    }

    #[tokio::test]
    async fn test_update_code_taken_by_other_is_conflict() {
        let existing = math();
        let id = existing.id.clone();

        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_code().returning(|_| {
            let mut other = math();
            other.code = "PHYS".into();
            Ok(Some(other))
        });
        repo.expect_update().never();

        let req = UpdateSubjectRequest {
            code: Some("PHYS".into()),
            ..Default::default()
        };
        let err = update_subject(State(state_with(repo)), Path(id), teacher(), ApiJson(req))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Subject code must be unique"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let mut repo = MockSubjectRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let err = delete_subject(State(state_with(repo)), Path("missing".into()), teacher())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
