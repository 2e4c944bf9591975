//! Content lifecycle rules for games and comments.
//!
//! All state transitions are explicit functions returning
//! `Ok(new_state)` or `Err(Denied)` so the rules live in one place instead of
//! being scattered through the handlers. Handlers map `Denied` to 403.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::auth::role::Role;
use crate::error::AppError;

/// Game publication status.
///
/// Stored as a string column in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Visible only to its developer and admins; not listed in the catalog.
    #[default]
    Draft,
    /// Listed in the public catalog.
    Published,
    /// Removed from the catalog by an admin; kept for the record.
    Archived,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GameStatus {
    /// Convert from the database string representation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Convert to the database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

/// Why a lifecycle transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    /// Caller's role is not allowed to perform the operation at all.
    RoleRequired,
    /// Operation is reserved to admins.
    AdminOnly,
    /// Caller is neither the owner of the resource nor an admin.
    NotOwner,
}

impl Denied {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::RoleRequired => "Only developers can publish games.",
            Self::AdminOnly => "Admin role required.",
            Self::NotOwner => "You do not have permission to modify this resource.",
        }
    }
}

impl From<Denied> for AppError {
    fn from(denied: Denied) -> Self {
        Self::Forbidden(denied.message().to_string())
    }
}

/// Ownership check with admin override, used by every Game/Comment mutation.
#[must_use]
pub fn is_owner_or_admin(claims: &Claims, owner_id: Uuid) -> bool {
    claims.role.is_admin() || claims.user_id().ok() == Some(owner_id)
}

/// Creation: only developers and admins may create a game; it starts in draft.
///
/// # Errors
///
/// Returns `Denied::RoleRequired` for player accounts.
pub const fn create_game(role: Role) -> Result<GameStatus, Denied> {
    match role {
        Role::Developer | Role::Admin => Ok(GameStatus::Draft),
        Role::Player => Err(Denied::RoleRequired),
    }
}

/// Status change requested through the generic game update path.
///
/// Admins may move a game to any status. The owner may only move their game
/// to `published` (self-publish without review, trust-on-write); archiving and
/// every other override is the admin moderation backstop.
///
/// # Errors
///
/// Returns `Denied` when the caller may not perform the requested transition.
pub fn set_game_status(
    target: GameStatus,
    claims: &Claims,
    owner_id: Uuid,
) -> Result<GameStatus, Denied> {
    if claims.role.is_admin() {
        return Ok(target);
    }
    if claims.user_id().ok() != Some(owner_id) {
        return Err(Denied::NotOwner);
    }
    match target {
        GameStatus::Published => Ok(GameStatus::Published),
        GameStatus::Draft | GameStatus::Archived => Err(Denied::AdminOnly),
    }
}

/// Initial approval state of a new comment: admin-authored comments are
/// auto-approved, everything else enters the moderation queue.
#[must_use]
pub const fn initial_comment_approval(role: Role) -> bool {
    role.is_admin()
}

/// Approve or reject a pending comment. Admin only; idempotent — setting
/// `is_approved` to its current value is a no-op success, not an error.
///
/// # Errors
///
/// Returns `Denied::AdminOnly` for non-admin callers.
pub const fn set_comment_approval(requested: bool, role: Role) -> Result<bool, Denied> {
    match role {
        Role::Admin => Ok(requested),
        Role::Player | Role::Developer => Err(Denied::AdminOnly),
    }
}

/// A comment may be hard-deleted by an admin or by its own author.
#[must_use]
pub fn can_delete_comment(claims: &Claims, author_id: Uuid) -> bool {
    is_owner_or_admin(claims, author_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(role: Role, user_id: Uuid) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: "tester".to_string(),
            role,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn status_round_trips_through_db_string() {
        for status in [GameStatus::Draft, GameStatus::Published, GameStatus::Archived] {
            assert_eq!(GameStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(GameStatus::from_str("deleted"), None);
    }

    #[test]
    fn players_cannot_create_games() {
        assert_eq!(create_game(Role::Player), Err(Denied::RoleRequired));
        assert_eq!(create_game(Role::Developer), Ok(GameStatus::Draft));
        assert_eq!(create_game(Role::Admin), Ok(GameStatus::Draft));
    }

    #[test]
    fn owner_may_self_publish_only() {
        let owner = Uuid::new_v4();
        let c = claims(Role::Developer, owner);

        assert_eq!(
            set_game_status(GameStatus::Published, &c, owner),
            Ok(GameStatus::Published)
        );
        assert_eq!(
            set_game_status(GameStatus::Archived, &c, owner),
            Err(Denied::AdminOnly)
        );
        assert_eq!(
            set_game_status(GameStatus::Draft, &c, owner),
            Err(Denied::AdminOnly)
        );
    }

    #[test]
    fn non_owner_is_refused_before_target_is_considered() {
        let c = claims(Role::Developer, Uuid::new_v4());
        assert_eq!(
            set_game_status(GameStatus::Published, &c, Uuid::new_v4()),
            Err(Denied::NotOwner)
        );
    }

    #[test]
    fn admin_overrides_every_game_transition() {
        let c = claims(Role::Admin, Uuid::new_v4());
        let owner = Uuid::new_v4();
        for target in [GameStatus::Draft, GameStatus::Published, GameStatus::Archived] {
            assert_eq!(set_game_status(target, &c, owner), Ok(target));
        }
    }

    #[test]
    fn admin_comments_are_auto_approved() {
        assert!(initial_comment_approval(Role::Admin));
        assert!(!initial_comment_approval(Role::Player));
        assert!(!initial_comment_approval(Role::Developer));
    }

    #[test]
    fn only_admins_moderate_comments() {
        assert_eq!(set_comment_approval(true, Role::Admin), Ok(true));
        assert_eq!(set_comment_approval(false, Role::Admin), Ok(false));
        assert_eq!(
            set_comment_approval(true, Role::Player),
            Err(Denied::AdminOnly)
        );
        assert_eq!(
            set_comment_approval(true, Role::Developer),
            Err(Denied::AdminOnly)
        );
    }

    #[test]
    fn comment_deletion_is_author_or_admin() {
        let author = Uuid::new_v4();
        assert!(can_delete_comment(&claims(Role::Player, author), author));
        assert!(can_delete_comment(&claims(Role::Admin, Uuid::new_v4()), author));
        assert!(!can_delete_comment(
            &claims(Role::Player, Uuid::new_v4()),
            author
        ));
    }
}
