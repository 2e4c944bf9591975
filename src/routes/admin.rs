use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AdminUser;
use crate::auth::role::Role;
use crate::entities::{comment, game, user};
use crate::error::AppError;
use crate::lifecycle::{self, GameStatus};
use crate::state::AppState;

/// Admin router: `/api/admin/...` — every handler requires the admin role via
/// the `AdminUser` extractor.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}/role", patch(set_user_role))
        .route("/comments/pending", get(pending_comments))
        .route("/comments/{id}/approval", patch(set_comment_approval))
        .route("/comments/{id}", delete(delete_comment))
        .route("/games", get(list_all_games))
        .route("/games/{id}/status", patch(set_game_status))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListUsersQuery {
    role: Option<String>,
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

#[derive(Deserialize)]
pub struct SetApprovalRequest {
    pub is_approved: bool,
}

#[derive(Deserialize)]
pub struct ListGamesQuery {
    status: Option<String>,
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
struct AdminUserResponse {
    id: Uuid,
    username: String,
    email: String,
    role: String,
    created_at: String,
    updated_at: String,
}

#[derive(Serialize)]
struct PendingCommentResponse {
    id: Uuid,
    game_id: Uuid,
    user_id: Uuid,
    content: String,
    author: Option<String>,
    game_title: Option<String>,
    created_at: String,
}

#[derive(Serialize)]
struct AdminGameResponse {
    id: Uuid,
    title: String,
    status: String,
    genre: String,
    developer_name: Option<String>,
    created_at: String,
    updated_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// User management
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/admin/users` — All accounts, optionally filtered by role.
async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut select = user::Entity::find();

    if let Some(raw) = &query.role {
        let role = Role::from_str(raw)
            .ok_or_else(|| AppError::Validation("Invalid role.".to_string()))?;
        select = select.filter(user::Column::Role.eq(role.as_str()));
    }

    let users = select
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let data: Vec<AdminUserResponse> = users
        .into_iter()
        .map(|u| AdminUserResponse {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

/// `PATCH /api/admin/users/:id/role` — Change an account's role.
///
/// The only path that can grant the admin role.
async fn set_user_role(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role =
        Role::from_str(&req.role).ok_or_else(|| AppError::Validation("Invalid role.".to_string()))?;

    let found = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let mut active: user::ActiveModel = found.into();
    active.role = Set(role.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(&state.db).await?;

    tracing::info!(user_id = %id, role = %role, "User role changed");

    Ok(Json(json!({
        "success": true,
        "message": "Role updated successfully.",
    })))
}

// ─────────────────────────────────────────────────────────────────────────────
// Comment moderation
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/admin/comments/pending` — The moderation queue (unapproved comments).
async fn pending_comments(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let pending = comment::Entity::find()
        .filter(comment::Column::IsApproved.eq(false))
        .order_by_desc(comment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut data = Vec::with_capacity(pending.len());
    for c in pending {
        let author = user::Entity::find_by_id(c.user_id)
            .one(&state.db)
            .await?
            .map(|u| u.username);
        let game_title = game::Entity::find_by_id(c.game_id)
            .one(&state.db)
            .await?
            .map(|g| g.title);

        data.push(PendingCommentResponse {
            id: c.id,
            game_id: c.game_id,
            user_id: c.user_id,
            content: c.content,
            author,
            game_title,
            created_at: c.created_at.to_rfc3339(),
        });
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

/// `PATCH /api/admin/comments/:id/approval` — Approve or reject a comment.
///
/// Idempotent: setting the flag to its current value is a no-op success.
async fn set_comment_approval(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetApprovalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let approved = lifecycle::set_comment_approval(req.is_approved, claims.role)?;

    let found = comment::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

    if found.is_approved != approved {
        let mut active: comment::ActiveModel = found.into();
        active.is_approved = Set(approved);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&state.db).await?;
    }

    Ok(Json(json!({
        "success": true,
        "message": "Comment approval updated.",
    })))
}

/// `DELETE /api/admin/comments/:id` — Hard-delete any comment.
async fn delete_comment(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = comment::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

    comment::Entity::delete_by_id(found.id)
        .exec(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Comment deleted.",
    })))
}

// ─────────────────────────────────────────────────────────────────────────────
// Game oversight
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/admin/games` — All games in any state, optionally filtered by status.
async fn list_all_games(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<ListGamesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut select = game::Entity::find();

    if let Some(raw) = &query.status {
        let status = GameStatus::from_str(raw)
            .ok_or_else(|| AppError::Validation("Invalid status.".to_string()))?;
        select = select.filter(game::Column::Status.eq(status.as_str()));
    }

    let games = select
        .order_by_desc(game::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut data = Vec::with_capacity(games.len());
    for g in games {
        let developer_name = user::Entity::find_by_id(g.developer_id)
            .one(&state.db)
            .await?
            .map(|u| u.username);

        data.push(AdminGameResponse {
            id: g.id,
            title: g.title,
            status: g.status,
            genre: g.genre,
            developer_name,
            created_at: g.created_at.to_rfc3339(),
            updated_at: g.updated_at.to_rfc3339(),
        });
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

/// `PATCH /api/admin/games/:id/status` — Moderation override of a game's status.
async fn set_game_status(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let target = GameStatus::from_str(&req.status)
        .ok_or_else(|| AppError::Validation("Invalid status.".to_string()))?;

    let found = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    let next = lifecycle::set_game_status(target, &claims, found.developer_id)?;

    let mut active: game::ActiveModel = found.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(&state.db).await?;

    tracing::info!(game_id = %id, status = %next, "Game status overridden");

    Ok(Json(json!({
        "success": true,
        "message": "Game status updated.",
    })))
}
