use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::{self, Claims, TokenError};
use crate::auth::role::Role;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Authentication is stateless: the claims are taken from the verified token
/// without a database round-trip. A missing or unparseable header is 401; a
/// token that fails verification (bad signature or expired) is 403, matching
/// the boundary mapping of the API.
///
/// Use as an extractor in handler parameters to require authentication:
/// ```ignore
/// async fn handler(AuthUser(claims): AuthUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthenticated("Authentication token required.".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthenticated("Invalid authorization header format.".to_string())
        })?;

        let claims = jwt::verify(token, &state.config.jwt_secret).map_err(|e| match e {
            TokenError::Expired => AppError::Forbidden("Token has expired.".to_string()),
            TokenError::Invalid => AppError::Forbidden("Invalid token.".to_string()),
        })?;

        Ok(Self(claims))
    }
}

/// Requires the authenticated caller to have the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        authorize(&claims, &[Role::Admin])?;
        Ok(Self(claims))
    }
}

/// Pure role predicate: fails with 403 when the caller's role is not in the
/// allowed set.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the role check fails.
pub fn authorize(claims: &Claims, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "tester".to_string(),
            role,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn authorize_allows_listed_roles() {
        assert!(authorize(&claims(Role::Developer), &[Role::Developer, Role::Admin]).is_ok());
        assert!(authorize(&claims(Role::Admin), &[Role::Admin]).is_ok());
    }

    #[test]
    fn authorize_rejects_unlisted_roles() {
        assert!(authorize(&claims(Role::Player), &[Role::Developer, Role::Admin]).is_err());
    }
}
