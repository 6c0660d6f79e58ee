//! Book model and catalog query types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A catalog book. Books are created out of band (seed data); only the
/// availability flag changes at runtime, and only through the lending service.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Whether the book is currently eligible to be borrowed
    pub available: bool,
}

/// Catalog search parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against title, author or ISBN.
    /// Absent or empty matches everything.
    pub q: Option<String>,
}
