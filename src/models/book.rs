//! Book model

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Book record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Assigned by the store on creation
    #[schema(read_only)]
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    /// Publication year
    pub year: i32,
}

/// Create / replace book request.
///
/// Any `id` sent by the client is ignored; the store assigns identifiers on
/// create and the path identifier wins on update.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(
        required(message = "Title is required"),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    pub author: Option<String>,
    #[validate(
        required(message = "Year is required"),
        range(min = 1000, max = 9999, message = "Year must be between 1000 and 9999")
    )]
    pub year: Option<i32>,
}

/// Rejects empty and whitespace-only strings
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Title is required"));
        return Err(error);
    }
    Ok(())
}

impl From<BookInput> for Book {
    fn from(input: BookInput) -> Self {
        Self {
            id: 0,
            title: input.title.unwrap_or_default(),
            author: input.author,
            year: input.year.unwrap_or_default(),
        }
    }
}
