//! Books service
//!
//! Delegates to the book repository. Absence and conflict outcomes are
//! passed through untouched for the API layer to translate.

use crate::{
    error::AppResult,
    models::Book,
    repository::{Repository, UpdateOutcome},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, book: Book) -> AppResult<Book> {
        self.repository.books.save(book).await
    }

    pub async fn update(&self, id: i32, book: Book) -> AppResult<UpdateOutcome<Book>> {
        self.repository.books.update(id, book).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Option<Book>> {
        self.repository.books.delete(id).await
    }

    /// Whether a book with this id is currently stored
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.get_by_id(id).await?.is_some())
    }
}
