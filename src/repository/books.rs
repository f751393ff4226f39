//! Table mapping for books

use sqlx::{postgres::PgArguments, query::QueryAs, Postgres};

use super::Entity;
use crate::models::Book;

impl Entity for Book {
    const KIND: &'static str = "Book";
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] = &["title", "author", "year"];

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn bind_columns<'q>(
        &'q self,
        query: QueryAs<'q, Postgres, Self, PgArguments>,
    ) -> QueryAs<'q, Postgres, Self, PgArguments> {
        query.bind(&self.title).bind(&self.author).bind(self.year)
    }
}
