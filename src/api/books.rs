//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{AuthorDto, BookDto, SearchQuery},
};

/// List books, optionally filtered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<BookDto>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.list(query.q.as_deref()).await?;
    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book.into()))
}

/// Create a book written by an author
#[utoipa::path(
    post,
    path = "/authors/{id}/books",
    tag = "books",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = BookDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid title, ISBN, year or language", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Path(author_id): Path<i64>,
    Json(book): Json<BookDto>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let created = state.services.books.create(author_id, &book).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update a book; its authors are kept as they are
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Path and body ids differ, or invalid fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(book): Json<BookDto>,
) -> AppResult<Json<BookDto>> {
    let updated = state.services.books.update(id, &book).await?;
    Ok(Json(updated.into()))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach an author to a book, creating the author if unknown
#[utoipa::path(
    put,
    path = "/books/{id}/authors",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = AuthorDto,
    responses(
        (status = 200, description = "Book with the author attached", body = BookDto),
        (status = 400, description = "Blank name for a new author", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(author): Json<AuthorDto>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.add_author(id, &author).await?;
    Ok(Json(book.into()))
}
