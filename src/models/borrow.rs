//! Borrow record model

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user-owned record of a borrowed book. The title is a denormalized copy
/// captured at borrow time and may drift from the catalog title. The due date
/// is a plain calendar date; no time of day, no timezone.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub title: String,
    /// Due date, serialized as YYYY-MM-DD
    pub due_date: NaiveDate,
    pub borrowed_at: DateTime<Utc>,
}
