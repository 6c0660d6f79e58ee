//! Lending service: the borrow/return protocol

use chrono::{Days, NaiveDate, Utc};

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::borrow::BorrowRecord,
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for a user. Fails with Conflict if the book is already
    /// out, NotFound if it does not exist; either way nothing changes.
    pub async fn borrow_book(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        // Fresh read: never trust a session snapshot of the user.
        self.repository.users.get_by_id(user_id).await?;

        let due_date = due_date_from(Utc::now().date_naive(), self.config.loan_period_days);

        let record = self.repository.borrows.borrow(user_id, book_id, due_date).await?;

        tracing::info!(
            user_id,
            book_id,
            due_date = %record.due_date,
            "book borrowed"
        );

        Ok(record)
    }

    /// Return a borrowed book. The caller must hold a matching record; if not,
    /// the operation fails with NotFound and the book's availability is left
    /// unchanged.
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        self.repository.users.get_by_id(user_id).await?;

        let record = self.repository.borrows.return_book(user_id, book_id).await?;

        tracing::info!(user_id, book_id, "book returned");

        Ok(record)
    }

    /// Get the user's outstanding borrow records, freshly read
    pub async fn borrowed_books(&self, user_id: i32) -> AppResult<Vec<BorrowRecord>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.borrows.list_for_user(user_id).await
    }
}

/// Calendar arithmetic only: the due date is the borrow date plus the loan
/// period, with time of day and timezone discarded.
pub(crate) fn due_date_from(today: NaiveDate, period_days: u32) -> NaiveDate {
    today + Days::new(period_days as u64)
}
