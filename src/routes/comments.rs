use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::entities::{comment, game, user};
use crate::error::AppError;
use crate::lifecycle;
use crate::state::AppState;

/// Comments router: `/api/comments/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comment))
        .route("/game/{game_id}", get(list_game_comments))
        .route("/{id}", delete(delete_comment))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub game_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Serialize)]
struct CommentResponse {
    id: Uuid,
    game_id: Uuid,
    user_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    is_approved: bool,
    username: Option<String>,
    avatar_url: Option<String>,
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replies: Option<Vec<CommentResponse>>,
}

async fn to_comment_response(
    db: &DatabaseConnection,
    c: comment::Model,
    replies: Option<Vec<CommentResponse>>,
) -> Result<CommentResponse, AppError> {
    let author = user::Entity::find_by_id(c.user_id).one(db).await?;

    Ok(CommentResponse {
        id: c.id,
        game_id: c.game_id,
        user_id: c.user_id,
        parent_id: c.parent_id,
        content: c.content,
        is_approved: c.is_approved,
        username: author.as_ref().map(|u| u.username.clone()),
        avatar_url: author.and_then(|u| u.avatar_url),
        created_at: c.created_at.to_rfc3339(),
        replies,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/comments/game/:game_id` — Approved comments for a game.
///
/// Top-level comments newest first, each with its approved replies oldest
/// first. One level of threading only, by query shape.
async fn list_game_comments(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let top_level = comment::Entity::find()
        .filter(comment::Column::GameId.eq(game_id))
        .filter(comment::Column::IsApproved.eq(true))
        .filter(comment::Column::ParentId.is_null())
        .order_by_desc(comment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut data = Vec::with_capacity(top_level.len());
    for c in top_level {
        let reply_models = comment::Entity::find()
            .filter(comment::Column::ParentId.eq(c.id))
            .filter(comment::Column::IsApproved.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&state.db)
            .await?;

        let mut replies = Vec::with_capacity(reply_models.len());
        for r in reply_models {
            replies.push(to_comment_response(&state.db, r, None).await?);
        }

        data.push(to_comment_response(&state.db, c, Some(replies)).await?);
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

/// `POST /api/comments` — Post a comment on a game.
///
/// Admin-authored comments are approved immediately; everything else enters
/// the moderation queue.
async fn create_comment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = req.content.trim().to_string();
    if content.is_empty() || content.len() > 1000 {
        return Err(AppError::Validation(
            "Comment must be between 1 and 1000 characters.".to_string(),
        ));
    }

    let game_exists = game::Entity::find_by_id(req.game_id)
        .one(&state.db)
        .await?
        .is_some();
    if !game_exists {
        return Err(AppError::NotFound("Game not found.".to_string()));
    }

    if let Some(parent_id) = req.parent_id {
        let parent_exists = comment::Entity::find_by_id(parent_id)
            .one(&state.db)
            .await?
            .is_some();
        if !parent_exists {
            return Err(AppError::NotFound("Parent comment not found.".to_string()));
        }
    }

    let is_approved = lifecycle::initial_comment_approval(claims.role);
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let now = chrono::Utc::now();
    let new_comment = comment::ActiveModel {
        id: Set(Uuid::new_v4()),
        game_id: Set(req.game_id),
        user_id: Set(user_id),
        parent_id: Set(req.parent_id),
        content: Set(content),
        is_approved: Set(is_approved),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let saved = new_comment.insert(&state.db).await?;
    let message = if saved.is_approved {
        "Comment added successfully."
    } else {
        "Comment submitted and awaiting moderation."
    };
    let data = to_comment_response(&state.db, saved, None).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": message,
            "data": data,
        })),
    ))
}

/// `DELETE /api/comments/:id` — Hard-delete a comment (author or admin).
///
/// Replies to the deleted comment are left in place (accepted orphaning).
async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = comment::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

    if !lifecycle::can_delete_comment(&claims, found.user_id) {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this comment.".to_string(),
        ));
    }

    comment::Entity::delete_by_id(found.id)
        .exec(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Comment deleted successfully.",
    })))
}
