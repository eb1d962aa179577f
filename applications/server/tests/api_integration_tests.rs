/// API integration tests
/// Tests complete HTTP request/response cycles with a real SQLite file
mod common;

use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};
use common::{empty_request, fixtures, json_request, TestApp, TEST_SECRET};
use gatehouse_core::{ProjectStore, Role, UserStore};
use gatehouse_server::TokenService;
use serde_json::json;
use tower::util::ServiceExt;

/// Create a project as admin and return its id
async fn create_project(app: &TestApp, token: &str, name: &str, description: &str) -> i64 {
    let body = json!({ "name": name, "description": description });
    let (status, project) = app
        .send(json_request("POST", "/projects", Some(token), &body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    project["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.send(empty_request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

/// Register then login; the token's role matches the registered role
#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;

    let (status, user) = app
        .register(fixtures::ADMIN_USERNAME, fixtures::ADMIN_PASSWORD, "admin")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], fixtures::ADMIN_USERNAME);
    assert_eq!(user["role"], "admin");
    assert!(user["id"].is_i64());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let (status, body) = app
        .login(fixtures::ADMIN_USERNAME, fixtures::ADMIN_PASSWORD)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    let token = body["access_token"].as_str().unwrap();
    let claims = app.tokens.verify(token).unwrap();
    assert_eq!(claims.sub, fixtures::ADMIN_USERNAME);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp - claims.iat, 30 * 60);
}

/// Password hashes are stored, never the plaintext
#[tokio::test]
async fn test_register_stores_hash_only() {
    let app = TestApp::new().await;
    app.register(fixtures::USER_USERNAME, fixtures::USER_PASSWORD, "user")
        .await;

    let credentials = app
        .db
        .find_credentials(fixtures::USER_USERNAME)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(credentials.password_hash, fixtures::USER_PASSWORD);
    assert!(credentials.password_hash.starts_with("$2"));
    assert_eq!(credentials.user.role, Role::User);
}

/// Each password rule is enforced with 400 and nothing is persisted
#[tokio::test]
async fn test_register_weak_passwords_rejected() {
    let app = TestApp::new().await;

    let weak = [
        "Ab1!xyz",        // too short
        "lowercase1!",    // no uppercase
        "UPPERCASE1!",    // no lowercase
        "NoDigitsHere!",  // no digit
        "NoSpecial1234",  // no special character
    ];

    for password in weak {
        let (status, body) = app.register("weakling", password, "user").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {:?}", password);
        assert_eq!(body["error"], "validation_error");
    }

    assert!(app.db.get_all_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new().await;

    let (status, _) = app
        .register(fixtures::USER_USERNAME, fixtures::USER_PASSWORD, "user")
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .register(fixtures::USER_USERNAME, "Different9Pass!", "admin")
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let users = app.db.get_all_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::User);

    // The original password still works
    let (status, _) = app
        .login(fixtures::USER_USERNAME, fixtures::USER_PASSWORD)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_unknown_role() {
    let app = TestApp::new().await;

    let (status, body) = app
        .register(fixtures::USER_USERNAME, fixtures::USER_PASSWORD, "root")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(app.db.get_all_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = TestApp::new().await;

    let body = json!({ "username": "someone" });
    let (status, body) = app
        .send(json_request("POST", "/register", None, &body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

/// Unknown user and wrong password are indistinguishable
#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new().await;
    app.register(fixtures::USER_USERNAME, fixtures::USER_PASSWORD, "user")
        .await;

    let (status, wrong_password) = app
        .login(fixtures::USER_USERNAME, "WrongPassword1!")
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app.login("nobody", fixtures::USER_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_projects_require_token() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/projects", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_projects_reject_bad_tokens() {
    let app = TestApp::new().await;
    app.register(fixtures::USER_USERNAME, fixtures::USER_PASSWORD, "user")
        .await;

    let forged = TokenService::new("some-other-secret", Duration::minutes(30))
        .issue(fixtures::USER_USERNAME, Role::Admin)
        .unwrap();
    let expired = TokenService::new(TEST_SECRET, Duration::minutes(30))
        .issue_at(
            fixtures::USER_USERNAME,
            Role::User,
            Utc::now() - Duration::minutes(31),
        )
        .unwrap();

    for token in ["garbage", "a.b.c", forged.as_str(), expired.as_str()] {
        let (status, body) = app
            .send(empty_request("GET", "/projects", Some(token)))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "accepted {:?}", token);
        assert_eq!(body["message"], "Could not validate credentials");
    }
}

/// A validly signed token whose subject has no account is refused
#[tokio::test]
async fn test_token_for_missing_account_rejected() {
    let issuing = TestApp::new().await;
    let token = issuing.admin_token().await;

    // Same signing secret, fresh database without that account
    let app = TestApp::new().await;

    let (status, body) = app
        .send(empty_request("GET", "/projects", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Could not validate credentials");

    let create = json!({ "name": "Ghost", "description": "from a stale token" });
    let (status, _) = app
        .send(json_request("POST", "/projects", Some(&token), &create))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.db.list_projects().await.unwrap().is_empty());
}

/// Writes without a usable token are 401 and change nothing
#[tokio::test]
async fn test_project_writes_require_token() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let id = create_project(&app, &admin, "Apollo", "Moonshot").await;
    let before = app.db.list_projects().await.unwrap();

    let forged = TokenService::new("some-other-secret", Duration::minutes(30))
        .issue(fixtures::ADMIN_USERNAME, Role::Admin)
        .unwrap();
    let body = json!({ "name": "Hijacked", "description": "nope" });
    let uri = format!("/projects/{}", id);

    for token in [None, Some(forged.as_str())] {
        let requests = [
            json_request("POST", "/projects", token, &body),
            json_request("PUT", &uri, token, &body),
            empty_request("DELETE", &uri, token),
        ];

        for request in requests {
            let method = request.method().clone();
            let response = app.router.clone().oneshot(request).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{} with token {:?}",
                method,
                token.is_some()
            );
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }

    assert_eq!(app.db.list_projects().await.unwrap(), before);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app.send(empty_request("GET", "/nowhere", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Non-admin writes are refused with 403 and leave the store unchanged
#[tokio::test]
async fn test_non_admin_cannot_write() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;

    let id = create_project(&app, &admin, "Apollo", "Moonshot").await;
    let before = app.db.list_projects().await.unwrap();

    let body = json!({ "name": "Hijacked", "description": "nope" });
    let uri = format!("/projects/{}", id);

    let (status, body_out) = app
        .send(json_request("POST", "/projects", Some(&user), &body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body_out["error"], "forbidden");

    let (status, _) = app
        .send(json_request("PUT", &uri, Some(&user), &body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(empty_request("DELETE", &uri, Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Role is checked before the body is parsed
    let (status, _) = app
        .send(json_request("POST", "/projects", Some(&user), &json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.db.list_projects().await.unwrap(), before);
}

/// The creating admin is recorded as owner; later edits keep it
#[tokio::test]
async fn test_project_records_creating_admin() {
    let app = TestApp::new().await;

    let (status, admin_user) = app
        .register(fixtures::ADMIN_USERNAME, fixtures::ADMIN_PASSWORD, "admin")
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, login) = app
        .login(fixtures::ADMIN_USERNAME, fixtures::ADMIN_PASSWORD)
        .await;
    let admin = login["access_token"].as_str().unwrap().to_string();

    let body = json!({ "name": "Apollo", "description": "Moonshot" });
    let (status, project) = app
        .send(json_request("POST", "/projects", Some(&admin), &body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["user_id"], admin_user["id"]);

    // A client-supplied owner is ignored
    let spoofed = json!({ "name": "Gemini", "description": "Two seats", "user_id": 999 });
    let (status, project) = app
        .send(json_request("POST", "/projects", Some(&admin), &spoofed))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["user_id"], admin_user["id"]);

    let uri = format!("/projects/{}", project["id"]);
    let (status, updated) = app
        .send(json_request("PUT", &uri, Some(&admin), &json!({ "name": "Gemini II" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["user_id"], admin_user["id"]);
}

#[tokio::test]
async fn test_create_then_get_project() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;

    let id = create_project(&app, &admin, "Apollo", "Moonshot").await;

    // Any authenticated user may read
    let (status, project) = app
        .send(empty_request("GET", &format!("/projects/{}", id), Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["id"], id);
    assert_eq!(project["name"], "Apollo");
    assert_eq!(project["description"], "Moonshot");

    let (status, projects) = app
        .send(empty_request("GET", "/projects", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(projects.as_array().unwrap().len(), 1);
    assert_eq!(projects[0], project);
}

#[tokio::test]
async fn test_get_missing_project() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let (status, body) = app
        .send(empty_request("GET", "/projects/999", Some(&user)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_invalid_project_id() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let (status, body) = app
        .send(empty_request("GET", "/projects/abc", Some(&user)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_update_project_partial() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let id = create_project(&app, &admin, "Apollo", "Moonshot").await;
    let uri = format!("/projects/{}", id);

    let (status, project) = app
        .send(json_request("PUT", &uri, Some(&admin), &json!({ "name": "Artemis" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["name"], "Artemis");
    assert_eq!(project["description"], "Moonshot");

    let (_, fetched) = app.send(empty_request("GET", &uri, Some(&admin))).await;
    assert_eq!(fetched, project);
}

#[tokio::test]
async fn test_update_missing_project() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .send(json_request(
            "PUT",
            "/projects/999",
            Some(&admin),
            &json!({ "name": "Ghost" }),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.db.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_project() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let keep = create_project(&app, &admin, "Apollo", "Moonshot").await;
    let gone = create_project(&app, &admin, "Gemini", "Two seats").await;

    let (status, body) = app
        .send(empty_request("DELETE", &format!("/projects/{}", gone), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .send(empty_request("GET", &format!("/projects/{}", gone), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = app.db.list_projects().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id.get(), keep);
}

/// Deleting a missing id is 404 and leaves the table as it was
#[tokio::test]
async fn test_delete_missing_project() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    create_project(&app, &admin, "Apollo", "Moonshot").await;
    let before = app.db.list_projects().await.unwrap();

    let (status, body) = app
        .send(empty_request("DELETE", "/projects/999", Some(&admin)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(app.db.list_projects().await.unwrap(), before);
}
