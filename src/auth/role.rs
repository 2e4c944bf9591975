use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role determining authorization outcomes.
///
/// Stored as a string column in the database; all in-process checks go through
/// this closed enum so role comparisons are exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account: browse, rate, favorite, comment.
    #[default]
    Player,
    /// May create games and manage their own catalog entries.
    Developer,
    /// Full override on every mutation path, plus moderation.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    /// Convert from the database string representation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "player" => Some(Self::Player),
            "developer" => Some(Self::Developer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to the database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Developer => "developer",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Roles a user may declare for themselves at registration.
    /// Admin accounts are only ever granted by another admin.
    #[must_use]
    pub const fn self_assignable(self) -> bool {
        matches!(self, Self::Player | Self::Developer)
    }
}
