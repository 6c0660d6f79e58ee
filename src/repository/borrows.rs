//! Borrow records repository: the borrow/return state machine.
//!
//! Every transition is a single transaction so the availability flag and the
//! borrow record can never disagree at a quiescent point: available = FALSE
//! iff exactly one borrow_records row references the book.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrow::BorrowRecord,
    repository::is_unique_violation,
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book: flip the availability flag and create the record as one
    /// atomic unit. The conditional UPDATE is the compare-and-set guard; under
    /// concurrent borrows of the same book exactly one caller sees a row.
    pub async fn borrow(
        &self,
        user_id: i32,
        book_id: i32,
        due_date: NaiveDate,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        // CAS guard: only succeeds while the book is still available. The
        // RETURNING clause captures the title at this instant for the
        // denormalized copy on the record.
        let title: Option<String> = sqlx::query_scalar(
            "UPDATE books SET available = FALSE WHERE id = $1 AND available = TRUE RETURNING title",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(title) = title else {
            // Nothing updated: distinguish a missing book from a borrowed one.
            // The transaction rolls back on drop, so no state changes.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(book_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                AppError::Conflict("Book is not available".to_string())
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        };

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (user_id, book_id, title, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(&title)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // UNIQUE(book_id) backstop; only reachable if the flag and the
            // records ever disagreed.
            if is_unique_violation(&e) {
                AppError::Conflict("Book is not available".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        tx.commit().await?;

        Ok(record)
    }

    /// Return a book: remove the caller's record and free the book, as one
    /// atomic unit. Requires a matching record; without one the book's
    /// availability is left untouched.
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            "DELETE FROM borrow_records WHERE user_id = $1 AND book_id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No borrow record for book {} under this user",
                book_id
            ))
        })?;

        sqlx::query("UPDATE books SET available = TRUE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Get a user's outstanding borrow records, oldest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE user_id = $1 ORDER BY borrowed_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
