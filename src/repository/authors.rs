//! Authors repository for PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{like_pattern, AuthorRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft},
};

/// A link created after the book count was taken trips the
/// `ON DELETE RESTRICT` key on `book_authors`.
fn delete_error(id: i64, e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::AuthorHasBooks(id)
        }
        _ => AppError::Database(e),
    }
}

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT id, full_name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, full_name FROM authors WHERE full_name ILIKE $1 ORDER BY id",
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT id, full_name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn create(&self, draft: &AuthorDraft) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (full_name) VALUES ($1) RETURNING id, full_name",
        )
        .bind(&draft.full_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    async fn update(&self, author: &Author) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET full_name = $1 WHERE id = $2 RETURNING id, full_name",
        )
        .bind(&author.full_name)
        .bind(author.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::AuthorNotFound(author.id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(id, e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::AuthorNotFound(id));
        }
        Ok(())
    }

    async fn count_books(&self, id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_authors WHERE author_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
