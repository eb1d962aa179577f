//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use gatehouse_core::Role;
use gatehouse_server::{api, AccountService, AppState, PasswordHasher, TokenService};
use gatehouse_storage::Database;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Lowest bcrypt cost, keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Test user credentials
pub mod fixtures {
    pub const USER_USERNAME: &str = "testuser";
    pub const USER_PASSWORD: &str = "TestPassword123!";

    pub const ADMIN_USERNAME: &str = "admin";
    pub const ADMIN_PASSWORD: &str = "AdminPassword456!";
}

/// Router plus handles on everything behind it
///
/// Uses a REAL SQLite file in a temp dir; the dir is removed on drop.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub tokens: Arc<TokenService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = Arc::new(
            Database::open(&db_url)
                .await
                .expect("Failed to open test database"),
        );

        let accounts = AccountService::new(db.clone(), PasswordHasher::new(TEST_BCRYPT_COST))
            .expect("Failed to create account service");
        let tokens = Arc::new(TokenService::new(TEST_SECRET, Duration::minutes(30)));

        let app_state = AppState::new(db.clone(), Arc::new(accounts), Arc::clone(&tokens));

        Self {
            router: api::create_router(app_state),
            db,
            tokens,
            _temp_dir: temp_dir,
        }
    }

    /// Send one request and return status plus parsed JSON body (Null if empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, body)
    }

    pub async fn register(&self, username: &str, password: &str, role: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "role": role,
        });
        self.send(json_request("POST", "/register", None, &body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        self.send(json_request("POST", "/login", None, &body)).await
    }

    /// Register and log in, returning the access token
    pub async fn token_for(&self, username: &str, password: &str, role: Role) -> String {
        let (status, _) = self.register(username, password, role.as_str()).await;
        assert_eq!(status, StatusCode::OK, "registration of {} failed", username);

        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "login of {} failed", username);
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(fixtures::ADMIN_USERNAME, fixtures::ADMIN_PASSWORD, Role::Admin)
            .await
    }

    pub async fn user_token(&self) -> String {
        self.token_for(fixtures::USER_USERNAME, fixtures::USER_PASSWORD, Role::User)
            .await
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}
