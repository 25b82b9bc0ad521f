//! Book model, its wire representation and field validation

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::author::{Author, AuthorDto};
use super::enums::Language;
use crate::error::{AppError, AppResult};

/// Minimum number of characters in the decimal rendering of an ISBN
pub const MIN_ISBN_LENGTH: usize = 10;

/// How many years ahead of the current one a publication year may reach (exclusive)
pub const MAX_YEARS_AHEAD: i32 = 10;

/// Book as stored, with its authors resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: i64,
    pub publisher: Option<String>,
    pub year: i32,
    pub language: Option<Language>,
    pub authors: Vec<Author>,
}

/// Validated book fields, without identity or associations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub isbn: i64,
    pub publisher: Option<String>,
    pub year: i32,
    pub language: Option<Language>,
}

/// Row of the `books` table
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub isbn: i64,
    pub publisher: Option<String>,
    pub year: i32,
    pub language: Option<String>,
}

impl BookRow {
    pub fn into_book(self, authors: Vec<Author>) -> Book {
        Book {
            id: self.id,
            title: self.title,
            isbn: self.isbn,
            publisher: self.publisher,
            year: self.year,
            language: self.language.as_deref().and_then(|l| l.parse().ok()),
            authors,
        }
    }
}

impl Book {
    pub fn from_draft(id: i64, draft: BookDraft, authors: Vec<Author>) -> Self {
        Self {
            id,
            title: draft.title,
            isbn: draft.isbn,
            publisher: draft.publisher,
            year: draft.year,
            language: draft.language,
            authors,
        }
    }

    /// Fetch-then-overwrite: identity and author set come from the stored
    /// book, every other field from the incoming one.
    pub fn merge(old: Book, incoming: BookDraft) -> Book {
        Book::from_draft(old.id, incoming, old.authors)
    }

    pub fn has_author(&self, author_id: i64) -> bool {
        self.authors.iter().any(|a| a.id == author_id)
    }
}

/// Book as exchanged over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    #[schema(example = "Les Misérables")]
    pub title: Option<String>,
    /// Numeric ISBN, at least 10 digits
    #[serde(default)]
    pub isbn: i64,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    #[schema(example = 1862)]
    pub year: i32,
    /// `french` or `english`, any case
    #[serde(default)]
    pub language: Option<String>,
    /// Ignored on input: associations are managed through the author endpoints
    #[serde(default)]
    pub authors: Vec<AuthorDto>,
}

impl BookDto {
    /// Check the fields in order and turn them into a draft. The first
    /// violated rule is reported.
    pub fn to_draft(&self, current_year: i32) -> AppResult<BookDraft> {
        let title = match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => return Err(AppError::BadRequest("Title is missing".to_string())),
        };

        if self.isbn.to_string().len() < MIN_ISBN_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Invalid ISBN {}: at least {} digits are required",
                self.isbn, MIN_ISBN_LENGTH
            )));
        }

        let year_limit = current_year + MAX_YEARS_AHEAD;
        if self.year >= year_limit {
            return Err(AppError::BadRequest(format!(
                "Invalid year {}: must be before {}",
                self.year, year_limit
            )));
        }

        let language = self
            .language
            .as_deref()
            .map(str::parse::<Language>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(BookDraft {
            title,
            isbn: self.isbn,
            publisher: self.publisher.clone(),
            year: self.year,
            language,
        })
    }
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: Some(book.title.clone()),
            isbn: book.isbn,
            publisher: book.publisher.clone(),
            year: book.year,
            language: book.language.map(|l| l.as_str().to_string()),
            authors: book.authors.iter().map(AuthorDto::from).collect(),
        }
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        BookDto::from(&book)
    }
}

/// `?q=` filter shared by the list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring to look for
    pub q: Option<String>,
}
