//! Books API endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{Book, BookInput},
    repository::{Entity, UpdateOutcome},
};

use super::ValidatedJson;

/// Plain message body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn message(status: StatusCode, message: String) -> Response {
    (status, Json(MessageResponse { message })).into_response()
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.books.get_by_id(id).await? {
        Some(book) => Ok(Json(book).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// Create book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<Book>)> {
    let book = state.services.books.create(Book::from(input)).await?;
    let location = format!("/api/books/{}", book.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Replace book
///
/// A concurrent modification is re-checked once: if the book has since been
/// deleted the request ends in 404, otherwise the conflict is surfaced as a
/// server error.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<Response> {
    match state.services.books.update(id, Book::from(input)).await? {
        UpdateOutcome::Updated(book) => Ok(Json(book).into_response()),
        UpdateOutcome::NotFound => Ok(message(
            StatusCode::NOT_FOUND,
            format!("{} with id: {} was not found", Book::KIND, id),
        )),
        UpdateOutcome::Conflict => {
            if state.services.books.exists(id).await? {
                return Err(AppError::ConcurrencyConflict { kind: Book::KIND, id });
            }
            Ok(message(
                StatusCode::NOT_FOUND,
                format!("{} with id: {} does not exist", Book::KIND, id),
            ))
        }
    }
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.books.delete(id).await? {
        Some(book) => Ok(message(
            StatusCode::OK,
            format!("{} '{}' was successfully deleted.", Book::KIND, book.title),
        )),
        None => Ok(message(
            StatusCode::NOT_FOUND,
            format!("{} with id '{}' was not found.", Book::KIND, id),
        )),
    }
}
