//! Catalog endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, SearchQuery},
};

use super::SessionUser;

/// List the full catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "catalog",
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    SessionUser(_principal): SessionUser,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Search the catalog by title, author or ISBN substring
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "catalog",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    SessionUser(_principal): SessionUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let q = query.q.unwrap_or_default();
    let books = state.services.catalog.search_books(&q).await?;
    Ok(Json(books))
}
