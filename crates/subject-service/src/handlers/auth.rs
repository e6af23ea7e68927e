//! 认证相关的 HTTP 处理器
//!
//! 提供注册、登录、获取当前会话和登出的 API。
//! Token 无状态，登出只需客户端丢弃 Token。

use axum::{Json, extract::State, http::StatusCode};
use edumarket_shared::observability::metrics::record_auth_attempt;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    auth::{Claims, hash_password, verify_password},
    dto::{AuthResponse, SessionResponse, SignInRequest, SignOutResponse, SignUpRequest},
    error::{ApiError, EMAIL_EXISTS, Result},
    extract::ApiJson,
    models::{User, UserDto, UserRole, normalize_email},
    state::AppState,
};

/// 签发 Token 并组装响应
fn issue(state: &AppState, user: &User) -> Result<AuthResponse> {
    let (token, expires_at) = state.jwt_manager.generate_token(user)?;
    Ok(AuthResponse {
        token,
        expires_at,
        user: UserDto::from(user),
    })
}

/// 用户注册
///
/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let email = normalize_email(&req.email);
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(EMAIL_EXISTS.to_string()));
    }

    let password_hash = hash_password(&req.password, state.bcrypt_cost)?;
    // 新用户一律为 GENERAL_USER，角色提升走管理员初始化或后台操作
    let user = User::new(&req.name, &email, password_hash, UserRole::GeneralUser);
    let user = state.users.insert(&user).await?;

    info!(user_id = %user.id, email = %user.email, "User signed up");

    Ok((StatusCode::CREATED, Json(issue(&state, &user)?)))
}

/// 用户登录
///
/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignInRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let Some(user) = state.users.find_by_email(&email).await? else {
        // 未知邮箱同样执行一次 bcrypt 比对，与密码错误的耗时一致
        verify_password(&req.password, state.dummy_password_hash()?)?;
        record_auth_attempt(false);
        warn!(email = %email, "Sign-in failed: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        record_auth_attempt(false);
        warn!(user_id = %user.id, "Sign-in failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    record_auth_attempt(true);
    info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok(Json(issue(&state, &user)?))
}

/// 获取当前会话
///
/// GET /api/auth/session
///
/// 以数据库中的最新记录为准，用户已被删除时返回 401
pub async fn get_session(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<SessionResponse>> {
    let user = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    Ok(Json(SessionResponse {
        user: UserDto::from(&user),
        expires_at: claims.exp,
    }))
}

/// 用户登出
///
/// POST /api/auth/sign-out
pub async fn sign_out(claims: Option<Claims>) -> Json<SignOutResponse> {
    if let Some(claims) = claims {
        info!(user_id = %claims.sub, "User signed out");
    }
    Json(SignOutResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockSubjectRepository, MockUserRepository};
    use edumarket_shared::config::AuthConfig;
    use std::sync::Arc;

    fn state_with(users: MockUserRepository) -> AppState {
        AppState::new(
            Arc::new(MockSubjectRepository::new()),
            Arc::new(users),
            &AuthConfig {
                bcrypt_cost: 4,
                ..AuthConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_skips_insert() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|email| {
            Ok(Some(User::new("Ada", email, "h".into(), UserRole::GeneralUser)))
        });
        users.expect_insert().never();

        let req = SignUpRequest {
            name: "Ada".into(),
            email: "ADA@example.com".into(),
            password: "password123".into(),
        };
        let err = sign_up(State(state_with(users)), ApiJson(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == EMAIL_EXISTS));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email_is_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let req = SignInRequest {
            email: "nobody@example.com".into(),
            password: "password123".into(),
        };
        let state = state_with(users);
        let err = sign_in(State(state.clone()), ApiJson(req)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        // 未知邮箱也走了一次 bcrypt 比对
        assert!(state.dummy_hash.get().is_some());
    }

    #[tokio::test]
    async fn test_session_for_deleted_user_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let claims = Claims {
            sub: "gone".into(),
            email: "gone@example.com".into(),
            name: "Gone".into(),
            role: "GENERAL_USER".into(),
            iat: 0,
            exp: i64::MAX,
            iss: "edumarket".into(),
        };
        let err = get_session(State(state_with(users)), claims).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_out_always_succeeds() {
        let Json(body) = sign_out(None).await;
        assert!(body.success);
    }
}
