//! Repository layer for database operations
//!
//! CRUD access is written once, generically, against the [`Entity`]
//! capability. Each entity kind supplies its table mapping and gets a
//! [`CrudRepository`] for free through [`PgRepository`].

pub mod books;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Pool, Postgres,
};

use crate::{error::AppResult, models::Book};

pub use postgres::PgRepository;

/// A persisted record kind with an integer, store-assigned identifier
pub trait Entity:
    for<'r> FromRow<'r, PgRow> + Default + Clone + Send + Sync + Unpin + 'static
{
    /// Human-readable kind, used in client-facing messages
    const KIND: &'static str;
    const TABLE: &'static str;
    /// Mutable columns, identifier excluded, in binding order
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);

    /// Bind the values of [`Entity::COLUMNS`], in order, onto `query`
    fn bind_columns<'q>(
        &'q self,
        query: QueryAs<'q, Postgres, Self, PgArguments>,
    ) -> QueryAs<'q, Postgres, Self, PgArguments>;
}

/// Result of a keyed update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    NotFound,
    /// The record changed between load and write
    Conflict,
}

/// Generic CRUD operations over one entity kind.
///
/// Absence is reported as a value (`None`, [`UpdateOutcome::NotFound`]);
/// errors are reserved for store failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CrudRepository<T: Entity>: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<T>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<T>>;

    /// Insert a new record. Any identifier on `entity` is ignored.
    async fn save(&self, entity: T) -> AppResult<T>;

    /// Replace every mutable field of record `id` with those of `entity`
    async fn update(&self, id: i32, entity: T) -> AppResult<UpdateOutcome<T>>;

    /// Remove record `id`, returning its last known value
    async fn delete(&self, id: i32) -> AppResult<Option<T>>;
}

/// Main repository struct holding one handle per entity kind
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn CrudRepository<Book>>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(PgRepository::<Book>::new(pool)),
        }
    }

    /// Build a repository from explicit handles
    pub fn with_books(books: Arc<dyn CrudRepository<Book>>) -> Self {
        Self { books }
    }
}
