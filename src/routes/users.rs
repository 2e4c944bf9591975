use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::auth::password;
use crate::auth::role::Role;
use crate::entities::{game, user};
use crate::error::{AppError, conflict_or_internal};
use crate::lifecycle;
use crate::state::AppState;

/// User profile router: `/api/users/...`
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_profile).put(update_profile))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Serialize)]
struct DeveloperGameResponse {
    id: Uuid,
    title: String,
    cover_image_url: Option<String>,
    status: String,
    views_count: i64,
    created_at: String,
}

/// `GET /api/users/:id` — Public profile; includes a developer's games.
async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let games = if Role::from_str(&found.role) == Some(Role::Developer) {
        let rows = game::Entity::find()
            .filter(game::Column::DeveloperId.eq(found.id))
            .order_by_desc(game::Column::CreatedAt)
            .all(&state.db)
            .await?;

        Some(
            rows.into_iter()
                .map(|g| DeveloperGameResponse {
                    id: g.id,
                    title: g.title,
                    cover_image_url: g.cover_image_url,
                    status: g.status,
                    views_count: g.views_count,
                    created_at: g.created_at.to_rfc3339(),
                })
                .collect::<Vec<_>>(),
        )
    } else {
        None
    };

    let mut data = json!({
        "id": found.id,
        "username": found.username,
        "email": found.email,
        "role": found.role,
        "avatar_url": found.avatar_url,
        "bio": found.bio,
        "created_at": found.created_at.to_rfc3339(),
    });
    if let (Some(games), Some(obj)) = (games, data.as_object_mut()) {
        obj.insert("games".to_string(), json!(games));
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

/// `PUT /api/users/:id` — Update a profile (self or admin).
async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !lifecycle::is_owner_or_admin(&claims, id) {
        return Err(AppError::Forbidden(
            "You do not have permission to modify this profile.".to_string(),
        ));
    }

    let found = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let mut active: user::ActiveModel = found.into();
    let mut touched = false;

    if let Some(username) = req.username {
        password::validate_username(&username).map_err(AppError::Validation)?;

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username.clone()))
            .filter(user::Column::Id.ne(id))
            .one(&state.db)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict(
                "This username is already taken.".to_string(),
            ));
        }

        active.username = Set(username);
        touched = true;
    }
    if let Some(bio) = req.bio {
        active.bio = Set(Some(bio));
        touched = true;
    }
    if let Some(url) = req.avatar_url {
        active.avatar_url = Set(Some(url));
        touched = true;
    }

    if !touched {
        return Err(AppError::Validation("No fields to update.".to_string()));
    }

    active.updated_at = Set(chrono::Utc::now().into());
    // The unique index backstops the username pre-check against a concurrent change
    active
        .update(&state.db)
        .await
        .map_err(|e| conflict_or_internal(e, "This username is already taken."))?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully.",
    })))
}
