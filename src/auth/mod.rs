pub mod extract;
pub mod jwt;
pub mod password;
pub mod role;

pub use extract::{AdminUser, AuthUser};
pub use role::Role;
