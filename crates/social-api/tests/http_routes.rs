use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use social_api::routes::types::LoginResponse;
use social_api::{AppState, create_router};
use social_auth::{JwtManager, verify_password};
use social_db::Database;
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "test-secret-key";

struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::in_memory().await.unwrap();
        let jwt = Arc::new(JwtManager::new(SECRET).unwrap());
        let router = create_router(AppState::new(db.clone(), jwt), None);
        Self { router, db }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        auth: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(&self, username: &str, email: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/register",
            Some(json!({
                "username": username,
                "password": "password123",
                "fullName": "John Doe",
                "email": email,
            })),
            None,
        )
        .await
    }

    /// Register (if needed) and log in, returning a ready `Authorization` value
    async fn bearer(&self, username: &str) -> String {
        self.register(username, &format!("{}@example.com", username)).await;
        let (status, body) = self
            .send(
                "POST",
                "/login",
                Some(json!({ "username": username, "password": "password123" })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        format!("Bearer {}", body["payload"]["token"].as_str().unwrap())
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");

    let (status, body) = app.send("GET", "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_register_persists_hashed_password() {
    let app = TestApp::new().await;
    let (status, body) = app.register("john_doe", "john@example.com").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "john_doe");
    assert_eq!(body["fullName"], "John Doe");
    assert_eq!(body["email"], "john@example.com");
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["createdAt"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let stored = app.db.get_user_by_username("john_doe").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "password123");
    assert!(verify_password("password123", &stored.password_hash));
}

#[tokio::test]
async fn test_register_conflicts() {
    let app = TestApp::new().await;
    assert_eq!(app.register("john_doe", "john@example.com").await.0, StatusCode::CREATED);

    let (status, body) = app.register("john_doe", "other@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = app.register("jane_doe", "john@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.register("john", "john@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.register("john_doe", "not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "POST",
            "/register",
            Some(json!({ "username": "john_doe", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_accepts_any_username_characters() {
    let app = TestApp::new().await;

    for (username, email) in [
        ("john.doe", "dot@example.com"),
        ("john doe", "space@example.com"),
        ("john@doe", "at@example.com"),
    ] {
        let (status, body) = app.register(username, email).await;
        assert_eq!(status, StatusCode::CREATED, "{}: {}", username, body);
        assert_eq!(body["username"], username);
    }
}

#[tokio::test]
async fn test_password_whitespace_is_kept() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            "POST",
            "/register",
            Some(json!({
                "username": "john_doe",
                "password": "        ",
                "fullName": "John Doe",
                "email": "john@example.com",
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "john_doe", "password": "        " })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_issues_three_hour_token() {
    let app = TestApp::new().await;
    app.register("john_doe", "john@example.com").await;

    let (status, body) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "john_doe", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let login: LoginResponse = serde_json::from_value(body).unwrap();
    let now = Utc::now();
    assert!(!login.payload.token.is_empty());
    assert_eq!(login.payload.username, "john_doe");
    assert!((login.payload.issued_at - now).num_milliseconds().abs() < 1000);
    assert!((login.payload.expired_at - (now + Duration::hours(3))).num_milliseconds().abs() < 1000);

    let claims = JwtManager::new(SECRET)
        .unwrap()
        .validate_token(&login.payload.token)
        .unwrap();
    assert_eq!(claims.sub, "john_doe");
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new().await;
    app.register("john_doe", "john@example.com").await;

    let (status, _) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "nobody_here", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "john_doe", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Login failed");

    let (status, _) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "john_doe", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");

    let (status, body) = app.send("GET", "/users", None, Some("")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");

    let (status, body) = app.send("GET", "/posts", None, Some("not-bearer-format")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Malformed authorization header");

    let (status, body) = app.send("GET", "/users/1", None, Some("Bearer abc.def.ghi")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_foreign_and_expired_tokens_rejected() {
    let app = TestApp::new().await;
    app.register("john_doe", "john@example.com").await;

    let foreign = JwtManager::new("someone-elses-key").unwrap().issue_token("john_doe").unwrap();
    let (status, _) = app
        .send("GET", "/users", None, Some(&format!("Bearer {}", foreign.token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = JwtManager::new(SECRET)
        .unwrap()
        .issue_token_at("john_doe", Utc::now() - Duration::hours(3) - Duration::seconds(5))
        .unwrap();
    let (status, _) = app
        .send("GET", "/users", None, Some(&format!("Bearer {}", expired.token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_crud() {
    let app = TestApp::new().await;
    let auth = app.bearer("john_doe").await;

    let (status, users) = app.send("GET", "/users", None, Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);

    let (status, created) = app
        .send(
            "POST",
            "/users",
            Some(json!({
                "username": "jane_doe",
                "password": "password456",
                "fullName": "Jane Doe",
                "email": "jane@example.com",
            })),
            Some(&auth),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = app.send("GET", &format!("/users/{}", id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["username"], "jane_doe");

    let (status, updated) = app
        .send(
            "PUT",
            &format!("/users/{}", id),
            Some(json!({ "fullName": "Jane Q. Doe" })),
            Some(&auth),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Jane Q. Doe");
    assert_eq!(updated["email"], "jane@example.com");

    let (status, _) = app
        .send("PUT", &format!("/users/{}", id), Some(json!({})), Some(&auth))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("DELETE", &format!("/users/{}", id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &format!("/users/{}", id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &format!("/users/{}", id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("GET", "/users/not-a-number", None, Some(&auth)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_password_update_changes_login() {
    let app = TestApp::new().await;
    let auth = app.bearer("john_doe").await;
    let me = app.db.get_user_by_username("john_doe").await.unwrap().unwrap();

    let (status, _) = app
        .send(
            "PUT",
            &format!("/users/{}", me.id),
            Some(json!({ "password": "brand-new-pass" })),
            Some(&auth),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "john_doe", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/login",
            Some(json!({ "username": "john_doe", "password": "brand-new-pass" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_post_crud() {
    let app = TestApp::new().await;
    let auth = app.bearer("john_doe").await;
    let me = app.db.get_user_by_username("john_doe").await.unwrap().unwrap();

    let (status, _) = app.send("GET", "/posts", None, Some(&auth)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, post) = app
        .send(
            "POST",
            "/posts",
            Some(json!({
                "title": "My first post",
                "body": "Hello, social world",
                "userID": me.id,
                "status": "published",
            })),
            Some(&auth),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["userID"], me.id);
    let post_id = post["postID"].as_i64().unwrap();

    let (status, _) = app
        .send(
            "POST",
            "/posts",
            Some(json!({
                "title": "Orphan post",
                "body": "Nobody wrote this",
                "userID": 999,
                "status": "published",
            })),
            Some(&auth),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = app
        .send(
            "PUT",
            &format!("/posts/{}", post_id),
            Some(json!({ "status": "archived" })),
            Some(&auth),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "archived");
    assert_eq!(updated["title"], "My first post");

    let (status, posts) = app.send("GET", "/posts", None, Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send("PUT", "/posts/999", Some(json!({ "status": "draft" })), Some(&auth))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &format!("/posts/{}", post_id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("DELETE", &format!("/posts/{}", post_id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "record is not found");

    let (status, _) = app.send("GET", &format!("/posts/{}", post_id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_flow() {
    let app = TestApp::new().await;
    let john = app.bearer("john_doe").await;
    app.register("jane_doe", "jane@example.com").await;
    let me = app.db.get_user_by_username("john_doe").await.unwrap().unwrap();
    let jane = app.db.get_user_by_username("jane_doe").await.unwrap().unwrap();

    let follow_uri = format!("/users/{}/follow", jane.id);

    let (status, edge) = app.send("POST", &follow_uri, None, Some(&john)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(edge["followingUserID"], jane.id);
    assert_eq!(edge["followerUserID"], me.id);

    let (status, _) = app.send("POST", &follow_uri, None, Some(&john)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("POST", &format!("/users/{}/follow", me.id), None, Some(&john))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/users/999/follow", None, Some(&john)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, followers) = app
        .send("GET", &format!("/users/{}/followers", jane.id), None, Some(&john))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(followers[0]["username"], "john_doe");

    let (status, following) = app
        .send("GET", &format!("/users/{}/following", me.id), None, Some(&john))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(following[0]["username"], "jane_doe");

    let (status, _) = app.send("DELETE", &follow_uri, None, Some(&john)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("DELETE", &follow_uri, None, Some(&john)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, followers) = app
        .send("GET", &format!("/users/{}/followers", jane.id), None, Some(&john))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(followers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
