//! Lending endpoints: borrow, return, borrowed list

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::borrow::BorrowRecord};

use super::SessionUser;

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book ID to borrow
    pub book_id: i32,
}

/// Borrow response with the created record
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub record: BorrowRecord,
    pub message: String,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
    pub book_id: i32,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "lending",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is not available")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    SessionUser(principal): SessionUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let record = state
        .services
        .lending
        .borrow_book(principal.user_id, request.book_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            record,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// List the caller's borrowed books
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "lending",
    responses(
        (status = 200, description = "Outstanding borrow records", body = Vec<BorrowRecord>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    SessionUser(principal): SessionUser,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state
        .services
        .lending
        .borrowed_books(principal.user_id)
        .await?;

    Ok(Json(records))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{book_id}/return",
    tag = "lending",
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No matching borrow record")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    SessionUser(principal): SessionUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    state
        .services
        .lending
        .return_book(principal.user_id, book_id)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        book_id,
    }))
}
