#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection};
use tower::ServiceExt;
use uuid::Uuid;

use game_universe_api::auth::role::Role;
use game_universe_api::auth::{jwt, password};
use game_universe_api::config::{Config, Environment};
use game_universe_api::entities::user;
use game_universe_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration_secs: 604_800,
        cors_origin: "http://localhost:3000".to_string(),
    }
}

/// Build the app against a fresh in-memory database.
///
/// A single pooled connection keeps every statement on the same `SQLite`
/// memory database.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);

    let db = sea_orm::Database::connect(opts).await.unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };

    (
        game_universe_api::routes::router().with_state(state),
        db,
    )
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_default();

    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, Some(token)).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body), Some(token)).await
}

pub async fn patch_json_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None, Some(token)).await
}

/// Register a user through the API and return (token, user id).
pub async fn register(
    app: &Router,
    username: &str,
    email: &str,
    role: &str,
) -> (String, Uuid) {
    let (status, body) = post_json(
        app,
        "/api/auth/register",
        &serde_json::json!({
            "username": username,
            "email": email,
            "password": "Password123!",
            "role": role,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

    let token = body["token"].as_str().unwrap_or_default().to_string();
    let user_id: Uuid = body["user"]["id"]
        .as_str()
        .unwrap_or_default()
        .parse()
        .unwrap_or_default();
    (token, user_id)
}

/// Insert an admin account directly (registration cannot self-declare admin)
/// and issue a token for it.
pub async fn create_admin(db: &DatabaseConnection, username: &str, email: &str) -> String {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let admin = user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password::hash_password("Password123!").unwrap_or_default()),
        role: Set(Role::Admin.as_str().to_string()),
        avatar_url: Set(None),
        bio: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    admin.insert(db).await.ok();

    jwt::issue(id, username, Role::Admin, TEST_SECRET, 3600).unwrap_or_default()
}

/// Create a published game owned by the developer behind `dev_token`.
pub async fn create_published_game(app: &Router, dev_token: &str, title: &str) -> Uuid {
    let (status, body) = post_json_auth(
        app,
        "/api/games",
        &serde_json::json!({
            "title": title,
            "description": "A test game.",
            "genre": "Action",
        }),
        dev_token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "game creation failed: {body}");

    let game_id: Uuid = body["data"]["id"]
        .as_str()
        .unwrap_or_default()
        .parse()
        .unwrap_or_default();

    let (status, body) = put_json_auth(
        app,
        &format!("/api/games/{game_id}"),
        &serde_json::json!({ "status": "published" }),
        dev_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "publish failed: {body}");

    game_id
}
