//! Bibliotheca Library Management System
//!
//! Books, users and loans over a Postgres schema, reachable through a
//! console menu and a set of web forms that share the same controllers.

use std::sync::Arc;

pub mod config;
pub mod console;
pub mod controllers;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod web;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controllers: Arc<controllers::Controllers>,
    pub database: repository::Database,
}
