//! Repository layer for persistence
//!
//! Services only see the [`AuthorRepository`] and [`BookRepository`] traits.
//! Two backends implement them: PostgreSQL through sqlx, and an in-memory
//! store used by tests and by `storage.backend = "memory"`.

pub mod authors;
pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, Book, BookDraft},
};

pub use authors::PgAuthorRepository;
pub use books::PgBookRepository;
pub use memory::MemoryRepository;

/// Author persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors, ordered by id
    async fn list(&self) -> AppResult<Vec<Author>>;

    /// Authors whose full name contains `query`, ignoring case
    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Author>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>>;

    /// Persist a new author; the store assigns the id
    async fn create(&self, draft: &AuthorDraft) -> AppResult<Author>;

    /// Overwrite a stored author. Fails with `AuthorNotFound` if absent.
    async fn update(&self, author: &Author) -> AppResult<Author>;

    /// Fails with `AuthorNotFound` if absent.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Number of books this author is associated with
    async fn count_books(&self, id: i64) -> AppResult<i64>;
}

/// Book persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books with their authors, ordered by id
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// Persist a new book linked to its first author
    async fn create(&self, draft: &BookDraft, author_id: i64) -> AppResult<Book>;

    /// Overwrite the scalar fields. Links are left untouched: `book.authors`
    /// is ignored. Fails with `BookNotFound` if absent.
    async fn update(&self, book: &Book) -> AppResult<Book>;

    /// Fails with `BookNotFound` if absent. Links are dropped with the book.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Link an author to a book; linking twice is a no-op
    async fn add_author(&self, book_id: i64, author_id: i64) -> AppResult<Book>;
}

/// Handle to the configured persistence backend
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgAuthorRepository::new(pool.clone())),
            books: Arc::new(PgBookRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = MemoryRepository::default();
        Self {
            authors: Arc::new(store.clone()),
            books: Arc::new(store),
            pool: None,
        }
    }

    /// Assemble a repository from arbitrary implementations
    pub fn from_parts(authors: Arc<dyn AuthorRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self {
            authors,
            books,
            pool: None,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .map_err(|e| AppError::Unavailable(format!("Database unreachable: {}", e)))?;
        }
        Ok(())
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally by `ILIKE`
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
