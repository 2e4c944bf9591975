use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::entities::{favorite, game};
use crate::error::{AppError, conflict_or_internal};
use crate::lifecycle::GameStatus;
use crate::state::AppState;

/// Favorites router: `/api/favorites/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/game/{game_id}/user", get(is_favorite))
        .route("/game/{game_id}", delete(remove_favorite))
}

#[derive(Deserialize)]
pub struct AddFavoriteRequest {
    pub game_id: Uuid,
}

#[derive(Serialize)]
struct FavoriteGameResponse {
    game_id: Uuid,
    title: String,
    cover_image_url: Option<String>,
    status: String,
    genre: String,
    views_count: i64,
}

/// `GET /api/favorites` — The caller's favorites with game summaries.
async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let rows = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .find_also_related(game::Entity)
        .order_by_desc(favorite::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let data: Vec<FavoriteGameResponse> = rows
        .into_iter()
        .filter_map(|(fav, maybe_game)| {
            maybe_game.map(|g| FavoriteGameResponse {
                game_id: fav.game_id,
                title: g.title,
                cover_image_url: g.cover_image_url,
                status: g.status,
                genre: g.genre,
                views_count: g.views_count,
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

/// `GET /api/favorites/game/:game_id/user` — Whether the caller favorited the game.
async fn is_favorite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let found = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::GameId.eq(game_id))
        .one(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": found.is_some(),
    })))
}

/// `POST /api/favorites` — Add a published game to the caller's favorites.
///
/// Duplicate submissions are rejected with 409; the unique index is the
/// race-safety backstop, so two rapid identical requests yield exactly one row.
async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let published = game::Entity::find_by_id(req.game_id)
        .filter(game::Column::Status.eq(GameStatus::Published.as_str()))
        .one(&state.db)
        .await?;
    if published.is_none() {
        return Err(AppError::NotFound("Game not found.".to_string()));
    }

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let new_favorite = favorite::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        game_id: Set(req.game_id),
        created_at: Set(chrono::Utc::now().into()),
    };

    new_favorite
        .insert(&state.db)
        .await
        .map_err(|e| conflict_or_internal(e, "This game is already in your favorites."))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Game added to favorites.",
        })),
    ))
}

/// `DELETE /api/favorites/game/:game_id` — Remove a favorite.
async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    favorite::Entity::delete_many()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::GameId.eq(game_id))
        .exec(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Game removed from favorites.",
    })))
}
