use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::auth::role::Role;
use crate::auth::{jwt, password};
use crate::entities::user;
use crate::error::{AppError, conflict_or_internal};
use crate::state::AppState;

/// Build the auth route group: `/api/auth/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            avatar_url: u.avatar_url,
            bio: u.bio,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/auth/register` — Create an account and issue a session token.
///
/// Self-declared roles are restricted to player and developer; admin accounts
/// are only created by an existing admin changing a role.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    password::validate_username(&req.username).map_err(AppError::Validation)?;
    password::validate_email(&req.email).map_err(AppError::Validation)?;
    password::validate_password(&req.password).map_err(AppError::Validation)?;

    let role = match req.role.as_deref() {
        None => Role::Player,
        Some(raw) => {
            let role = Role::from_str(raw)
                .ok_or_else(|| AppError::Validation("Invalid role.".to_string()))?;
            if !role.self_assignable() {
                return Err(AppError::Validation("Invalid role.".to_string()));
            }
            role
        }
    };

    let email = req.email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Email.eq(email.clone()))
                .add(user::Column::Username.eq(req.username.clone())),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "A user with this email or username already exists.".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;
    let now = chrono::Utc::now();

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(req.username),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        avatar_url: Set(None),
        bio: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    // The unique indexes backstop the pre-check against a concurrent signup
    let saved = new_user.insert(&state.db).await.map_err(|e| {
        conflict_or_internal(e, "A user with this email or username already exists.")
    })?;

    let token = jwt::issue(
        saved.id,
        &saved.username,
        role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    tracing::info!(user_id = %saved.id, role = %role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful.",
            "token": token,
            "user": UserResponse::from(saved),
        })),
    ))
}

/// `POST /api/auth/login` — Verify credentials and issue a session token.
///
/// Failures never indicate which of email or password was wrong.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    password::validate_email(&req.email).map_err(AppError::Validation)?;
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required.".to_string()));
    }

    let email = req.email.trim().to_lowercase();

    let found = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await?;

    let Some(found) = found else {
        return Err(AppError::Unauthenticated(
            "Incorrect email or password.".to_string(),
        ));
    };

    if !password::verify_password(&req.password, &found.password_hash)? {
        return Err(AppError::Unauthenticated(
            "Incorrect email or password.".to_string(),
        ));
    }

    let role = Role::from_str(&found.role).unwrap_or_default();

    let token = jwt::issue(
        found.id,
        &found.username,
        role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful.",
        "token": token,
        "user": UserResponse::from(found),
    })))
}

/// `GET /api/auth/me` — Profile of the authenticated caller.
async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let found = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "user": UserResponse::from(found),
    })))
}
