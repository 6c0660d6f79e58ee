//! Biblos Library Lending Server
//!
//! A Rust implementation of a small library-lending service: accounts,
//! catalog browsing and search, and a borrow/return protocol whose state
//! transitions are single atomic transactions.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
