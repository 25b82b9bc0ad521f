//! Books repository for PostgreSQL

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::{book::BookRow, Author, Book, BookDraft},
};

const BOOK_COLUMNS: &str = "b.id, b.title, b.isbn, b.publisher, b.year, b.language";

/// Author joined through `book_authors`
#[derive(Debug, FromRow)]
struct LinkedAuthor {
    book_id: i64,
    id: i64,
    full_name: String,
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Resolve the authors of every row in one query
    async fn with_authors(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, LinkedAuthor>(
            r#"
            SELECT ba.book_id, a.id, a.full_name
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = ANY($1)
            ORDER BY a.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i64, Vec<Author>> = HashMap::new();
        for link in links {
            by_book.entry(link.book_id).or_default().push(Author {
                id: link.id,
                full_name: link.full_name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let authors = by_book.remove(&row.id).unwrap_or_default();
                row.into_book(authors)
            })
            .collect())
    }

    async fn get(&self, id: i64) -> AppResult<Book> {
        self.find_by_id(id).await?.ok_or(AppError::BookNotFound(id))
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("SELECT {} FROM books b ORDER BY b.id", BOOK_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        self.with_authors(rows).await
    }

    async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            SELECT {}
            FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = $1
            ORDER BY b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        self.with_authors(rows).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("SELECT {} FROM books b WHERE b.id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(self.with_authors(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: &BookDraft, author_id: i64) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, isbn, publisher, year, language)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(draft.isbn)
        .bind(&draft.publisher)
        .bind(draft.year)
        .bind(draft.language.map(|l| l.as_str()))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
            .bind(id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Inserted book {} linked to author {}", id, author_id);
        self.get(id).await
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, isbn = $2, publisher = $3, year = $4, language = $5
            WHERE id = $6
            "#,
        )
        .bind(&book.title)
        .bind(book.isbn)
        .bind(&book.publisher)
        .bind(book.year)
        .bind(book.language.map(|l| l.as_str()))
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(book.id));
        }

        self.get(book.id).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(id));
        }
        Ok(())
    }

    async fn add_author(&self, book_id: i64, author_id: i64) -> AppResult<Book> {
        sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(book_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        self.get(book_id).await
    }
}
