pub mod comment;
pub mod favorite;
pub mod game;
pub mod genre;
pub mod rating;
pub mod user;
