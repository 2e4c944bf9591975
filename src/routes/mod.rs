mod admin;
mod auth;
mod comments;
mod favorites;
mod games;
mod health;
mod ratings;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — health check with database connectivity
/// - `/api/auth`, `/api/games`, `/api/users`, `/api/comments`, `/api/ratings`,
///   `/api/favorites`, `/api/admin` — the REST surface
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth::router())
        .nest("/games", games::router())
        .nest("/users", users::router())
        .nest("/comments", comments::router())
        .nest("/ratings", ratings::router())
        .nest("/favorites", favorites::router())
        .nest("/admin", admin::router());

    Router::new().merge(health::router()).nest("/api", api)
}
