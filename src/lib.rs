//! Game Universe API - Backend for an indie game catalog and marketplace
//!
//! This crate provides the REST API for Game Universe, enabling:
//! - Role-based accounts (player, developer, admin) with stateless JWT sessions
//! - Publishing and discovering games through a draft/published/archived lifecycle
//! - Ratings, favorites, and moderated comments on published games

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod state;
