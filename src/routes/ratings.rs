use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::entities::{game, rating};
use crate::error::{AppError, conflict_or_internal};
use crate::state::AppState;

/// Ratings router: `/api/ratings/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upsert_rating))
        .route("/game/{game_id}/user", get(get_own_rating))
        .route("/game/{game_id}", delete(delete_rating))
}

#[derive(Deserialize)]
pub struct RateGameRequest {
    pub game_id: Uuid,
    pub rating: i32,
}

/// `POST /api/ratings` — Rate a game, 1-5 stars.
///
/// At most one rating per (user, game): a second submission updates the
/// existing row. The unique index backstops the check-then-insert race.
async fn upsert_rating(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<RateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5.".to_string(),
        ));
    }

    let game_exists = game::Entity::find_by_id(req.game_id)
        .one(&state.db)
        .await?
        .is_some();
    if !game_exists {
        return Err(AppError::NotFound("Game not found.".to_string()));
    }

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;
    let now = chrono::Utc::now();

    let existing = rating::Entity::find()
        .filter(rating::Column::GameId.eq(req.game_id))
        .filter(rating::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?;

    if let Some(existing) = existing {
        let mut active: rating::ActiveModel = existing.into();
        active.rating = Set(req.rating);
        active.updated_at = Set(now.into());
        active.update(&state.db).await?;

        return Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Rating updated successfully.",
            })),
        ));
    }

    let new_rating = rating::ActiveModel {
        id: Set(Uuid::new_v4()),
        game_id: Set(req.game_id),
        user_id: Set(user_id),
        rating: Set(req.rating),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    new_rating
        .insert(&state.db)
        .await
        .map_err(|e| conflict_or_internal(e, "You have already rated this game."))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Rating added successfully.",
        })),
    ))
}

/// `GET /api/ratings/game/:game_id/user` — The caller's rating, or null.
async fn get_own_rating(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let found = rating::Entity::find()
        .filter(rating::Column::GameId.eq(game_id))
        .filter(rating::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": found,
    })))
}

/// `DELETE /api/ratings/game/:game_id` — Remove the caller's rating.
async fn delete_rating(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    rating::Entity::delete_many()
        .filter(rating::Column::GameId.eq(game_id))
        .filter(rating::Column::UserId.eq(user_id))
        .exec(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Rating removed successfully.",
    })))
}
