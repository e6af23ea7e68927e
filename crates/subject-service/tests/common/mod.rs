//! 集成测试公共工具
//!
//! 基于内存存储构建完整路由，通过 oneshot 发送请求

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use edumarket_shared::config::AuthConfig;
use serde_json::Value;
use subject_service::{AppState, User, UserRole, routes};
use tower::ServiceExt;

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let auth = AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        Self {
            state: AppState::in_memory(&auth),
        }
    }

    pub fn router(&self) -> Router {
        routes::app(self.state.clone())
    }

    /// 直接写入指定角色的用户并签发 Token
    pub async fn user_with_token(&self, role: UserRole) -> (User, String) {
        let email = format!("{}-{}@example.com", role.as_str().to_lowercase(), uuid::Uuid::new_v4());
        let user = User::new("Test User", &email, "unused".into(), role);
        self.state.users.insert(&user).await.unwrap();
        let (token, _) = self.state.jwt_manager.generate_token(&user).unwrap();
        (user, token)
    }

    pub async fn token_for(&self, role: UserRole) -> String {
        self.user_with_token(role).await.1
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
