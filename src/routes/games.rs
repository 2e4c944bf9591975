use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, Func, NullOrdering, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::entities::{comment, favorite, game, genre, rating, user};
use crate::error::AppError;
use crate::lifecycle::{self, GameStatus};
use crate::state::AppState;

/// Game catalog router: `/api/games/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route("/genres/list", get(list_genres))
        .route(
            "/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    genre: Option<String>,
    search: Option<String>,
    sort: Option<String>,
    #[serde(default = "default_page")]
    page: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    12
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    title: String,
    description: String,
    short_description: Option<String>,
    genre: String,
    price: Option<f64>,
    release_date: Option<chrono::NaiveDate>,
    cover_image_url: Option<String>,
    trailer_url: Option<String>,
    game_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    title: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    genre: Option<String>,
    price: Option<f64>,
    release_date: Option<chrono::NaiveDate>,
    cover_image_url: Option<String>,
    trailer_url: Option<String>,
    game_url: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct GameResponse {
    id: Uuid,
    developer_id: Uuid,
    developer_name: Option<String>,
    title: String,
    description: String,
    short_description: Option<String>,
    genre: String,
    price: f64,
    release_date: Option<chrono::NaiveDate>,
    cover_image_url: Option<String>,
    trailer_url: Option<String>,
    game_url: Option<String>,
    status: String,
    views_count: i64,
    average_rating: f64,
    ratings_count: u64,
    comments_count: u64,
    favorites_count: u64,
    created_at: String,
    updated_at: String,
}

/// Read-side aggregates, computed on read so they are always consistent with
/// the latest committed writes.
struct GameStats {
    average_rating: f64,
    ratings_count: u64,
    comments_count: u64,
    favorites_count: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn load_game_stats(db: &DatabaseConnection, game_id: Uuid) -> Result<GameStats, AppError> {
    let ratings: Vec<i32> = rating::Entity::find()
        .filter(rating::Column::GameId.eq(game_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.rating)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64
    };

    let comments_count = comment::Entity::find()
        .filter(comment::Column::GameId.eq(game_id))
        .filter(comment::Column::IsApproved.eq(true))
        .count(db)
        .await?;

    let favorites_count = favorite::Entity::find()
        .filter(favorite::Column::GameId.eq(game_id))
        .count(db)
        .await?;

    Ok(GameStats {
        average_rating,
        ratings_count: ratings.len() as u64,
        comments_count,
        favorites_count,
    })
}

async fn to_game_response(
    db: &DatabaseConnection,
    game: game::Model,
) -> Result<GameResponse, AppError> {
    let stats = load_game_stats(db, game.id).await?;
    let developer_name = user::Entity::find_by_id(game.developer_id)
        .one(db)
        .await?
        .map(|u| u.username);

    Ok(GameResponse {
        id: game.id,
        developer_id: game.developer_id,
        developer_name,
        title: game.title,
        description: game.description,
        short_description: game.short_description,
        genre: game.genre,
        price: game.price,
        release_date: game.release_date,
        cover_image_url: game.cover_image_url,
        trailer_url: game.trailer_url,
        game_url: game.game_url,
        status: game.status,
        views_count: game.views_count,
        average_rating: stats.average_rating,
        ratings_count: stats.ratings_count,
        comments_count: stats.comments_count,
        favorites_count: stats.favorites_count,
        created_at: game.created_at.to_rfc3339(),
        updated_at: game.updated_at.to_rfc3339(),
    })
}

fn published_filter(query: &ListGamesQuery) -> sea_orm::Select<game::Entity> {
    let mut select = game::Entity::find()
        .filter(game::Column::Status.eq(GameStatus::Published.as_str()));

    if let Some(genre) = &query.genre {
        select = select.filter(game::Column::Genre.eq(genre.clone()));
    }

    if let Some(search) = &query.search {
        select = select.filter(
            Condition::any()
                .add(game::Column::Title.contains(search.clone()))
                .add(game::Column::Description.contains(search.clone()))
                .add(game::Column::ShortDescription.contains(search.clone())),
        );
    }

    select
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/games` — Published catalog with filters, sorting, and pagination.
async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sort = query.sort.as_deref().unwrap_or("popularity");
    if !matches!(sort, "popularity" | "rating" | "date" | "name") {
        return Err(AppError::Validation("Invalid sort option.".to_string()));
    }

    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);
    let offset = (page - 1) * limit;

    let total = published_filter(&query).count(&state.db).await?;

    let select = match sort {
        // Average rating is an on-read aggregate, resolved in one grouped
        // query; unrated games sort last
        "rating" => published_filter(&query)
            .join(JoinType::LeftJoin, game::Relation::Ratings.def())
            .group_by(game::Column::Id)
            .order_by_with_nulls(
                SimpleExpr::from(Func::avg(Expr::col((
                    rating::Entity,
                    rating::Column::Rating,
                )))),
                Order::Desc,
                NullOrdering::Last,
            )
            .order_by_desc(game::Column::CreatedAt),
        "date" => published_filter(&query)
            .order_by_desc(game::Column::ReleaseDate)
            .order_by_desc(game::Column::CreatedAt),
        "name" => published_filter(&query).order_by_asc(game::Column::Title),
        _ => published_filter(&query)
            .order_by_desc(game::Column::ViewsCount)
            .order_by_desc(game::Column::CreatedAt),
    };

    let games = select.offset(offset).limit(limit).all(&state.db).await?;

    let mut data = Vec::with_capacity(games.len());
    for g in games {
        data.push(to_game_response(&state.db, g).await?);
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "total_pages": total.div_ceil(limit),
        },
    })))
}

/// `GET /api/games/:id` — Game detail with aggregates.
///
/// Side effect: increments the view counter unconditionally on every fetch,
/// including repeated fetches and fetches by the owner.
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    // Atomic in-database increment; monotonic under concurrent fetches
    game::Entity::update_many()
        .col_expr(
            game::Column::ViewsCount,
            Expr::col(game::Column::ViewsCount).add(1),
        )
        .filter(game::Column::Id.eq(id))
        .exec(&state.db)
        .await?;

    let mut response = to_game_response(&state.db, found).await?;
    response.views_count += 1;

    Ok(Json(json!({
        "success": true,
        "data": response,
    })))
}

/// `POST /api/games` — Create a game in draft state (developer or admin).
async fn create_game(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = req.title.trim().to_string();
    if title.is_empty() || title.len() > 200 {
        return Err(AppError::Validation(
            "Title is required (max 200 characters).".to_string(),
        ));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required.".to_string()));
    }
    if req.genre.trim().is_empty() {
        return Err(AppError::Validation("Genre is required.".to_string()));
    }
    if let Some(short) = &req.short_description {
        if short.len() > 500 {
            return Err(AppError::Validation(
                "Short description must be at most 500 characters.".to_string(),
            ));
        }
    }
    let price = req.price.unwrap_or(0.0);
    if price < 0.0 {
        return Err(AppError::Validation(
            "Price must not be negative.".to_string(),
        ));
    }

    let status = lifecycle::create_game(claims.role)?;
    let developer_id = claims
        .user_id()
        .map_err(|_| AppError::Forbidden("Invalid token subject.".to_string()))?;

    let now = chrono::Utc::now();
    let new_game = game::ActiveModel {
        id: Set(Uuid::new_v4()),
        developer_id: Set(developer_id),
        title: Set(title),
        description: Set(req.description),
        short_description: Set(req.short_description),
        genre: Set(req.genre),
        price: Set(price),
        release_date: Set(req.release_date),
        cover_image_url: Set(req.cover_image_url),
        trailer_url: Set(req.trailer_url),
        game_url: Set(req.game_url),
        status: Set(status.as_str().to_string()),
        views_count: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let saved = new_game.insert(&state.db).await?;

    tracing::info!(game_id = %saved.id, developer_id = %saved.developer_id, "Game created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Game created successfully.",
            "data": {
                "id": saved.id,
                "title": saved.title,
                "status": saved.status,
            },
        })),
    ))
}

/// `PUT /api/games/:id` — Update a game (owner or admin).
///
/// A status change goes through the lifecycle rules: admins may set any
/// status, the owner may only self-publish.
async fn update_game(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let found = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    if !lifecycle::is_owner_or_admin(&claims, found.developer_id) {
        return Err(AppError::Forbidden(
            "You do not have permission to modify this game.".to_string(),
        ));
    }

    let owner_id = found.developer_id;
    let mut active: game::ActiveModel = found.into();
    let mut touched = false;

    if let Some(title) = req.title {
        let title = title.trim().to_string();
        if title.is_empty() || title.len() > 200 {
            return Err(AppError::Validation(
                "Title is required (max 200 characters).".to_string(),
            ));
        }
        active.title = Set(title);
        touched = true;
    }
    if let Some(description) = req.description {
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "Description cannot be empty.".to_string(),
            ));
        }
        active.description = Set(description);
        touched = true;
    }
    if let Some(short) = req.short_description {
        if short.len() > 500 {
            return Err(AppError::Validation(
                "Short description must be at most 500 characters.".to_string(),
            ));
        }
        active.short_description = Set(Some(short));
        touched = true;
    }
    if let Some(genre) = req.genre {
        if genre.trim().is_empty() {
            return Err(AppError::Validation("Genre cannot be empty.".to_string()));
        }
        active.genre = Set(genre);
        touched = true;
    }
    if let Some(price) = req.price {
        if price < 0.0 {
            return Err(AppError::Validation(
                "Price must not be negative.".to_string(),
            ));
        }
        active.price = Set(price);
        touched = true;
    }
    if let Some(date) = req.release_date {
        active.release_date = Set(Some(date));
        touched = true;
    }
    if let Some(url) = req.cover_image_url {
        active.cover_image_url = Set(Some(url));
        touched = true;
    }
    if let Some(url) = req.trailer_url {
        active.trailer_url = Set(Some(url));
        touched = true;
    }
    if let Some(url) = req.game_url {
        active.game_url = Set(Some(url));
        touched = true;
    }
    if let Some(raw) = req.status {
        let target = GameStatus::from_str(&raw)
            .ok_or_else(|| AppError::Validation("Invalid status.".to_string()))?;
        let next = lifecycle::set_game_status(target, &claims, owner_id)?;
        active.status = Set(next.as_str().to_string());
        touched = true;
    }

    if !touched {
        return Err(AppError::Validation("No fields to update.".to_string()));
    }

    active.updated_at = Set(chrono::Utc::now().into());
    active.update(&state.db).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Game updated successfully.",
    })))
}

/// `DELETE /api/games/:id` — Hard-delete a game (owner or admin).
async fn delete_game(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    if !lifecycle::is_owner_or_admin(&claims, found.developer_id) {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this game.".to_string(),
        ));
    }

    game::Entity::delete_by_id(found.id).exec(&state.db).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Game deleted successfully.",
    })))
}

/// `GET /api/games/genres/list` — Seeded genre reference list.
async fn list_genres(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let genres = genre::Entity::find()
        .order_by_asc(genre::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": genres,
    })))
}
