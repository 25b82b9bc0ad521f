//! Book management service

use chrono::{Datelike, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{AuthorDraft, AuthorDto, Book, BookDto},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

fn current_year() -> i32 {
    Utc::now().year()
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books, or only those whose title contains `query` (ignoring case)
    pub async fn list(&self, query: Option<&str>) -> AppResult<Vec<Book>> {
        let books = self.repository.books.list().await?;
        let Some(query) = query else {
            return Ok(books);
        };

        let needle = query.to_lowercase();
        Ok(books
            .into_iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    /// Create a book written by `author_id`. Fields are validated before the
    /// author is looked up; any authors listed in the body are ignored.
    pub async fn create(&self, author_id: i64, book: &BookDto) -> AppResult<Book> {
        let draft = book.to_draft(current_year())?;

        let author = self
            .repository
            .authors
            .find_by_id(author_id)
            .await?
            .ok_or(AppError::AuthorNotFound(author_id))?;

        let created = self.repository.books.create(&draft, author.id).await?;
        tracing::info!("Created book {} ({}) for author {}", created.id, created.title, author.id);
        Ok(created)
    }

    /// Overwrite every field of an existing book except its authors
    pub async fn update(&self, id: i64, book: &BookDto) -> AppResult<Book> {
        if book.id != Some(id) {
            tracing::debug!("Rejected book update: path id {} vs body id {:?}", id, book.id);
            return Err(AppError::IdMismatch { path: id, body: book.id });
        }
        let draft = book.to_draft(current_year())?;

        let old = self.get(id).await?;
        let merged = Book::merge(old, draft);
        let updated = self.repository.books.update(&merged).await?;
        tracing::info!("Updated book {}", updated.id);
        Ok(updated)
    }

    /// Delete a book; its author links go with it
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Attach an author to a book.
    ///
    /// When the body's id is missing or unknown, a new author is created from
    /// the body's name. The created author gets a store-assigned id, which may
    /// differ from the one in the body, and that author is the one attached.
    pub async fn add_author(&self, book_id: i64, author: &AuthorDto) -> AppResult<Book> {
        let book = self.get(book_id).await?;

        let existing = match author.id {
            Some(id) => self.repository.authors.find_by_id(id).await?,
            None => None,
        };
        let author = match existing {
            Some(existing) => existing,
            None => {
                author.validate()?;
                let created = self.repository.authors.create(&AuthorDraft::from(author)).await?;
                tracing::info!(
                    "Created author {} ({}) while attaching to book {} (requested id {:?})",
                    created.id,
                    created.full_name,
                    book_id,
                    author.id
                );
                created
            }
        };

        if book.has_author(author.id) {
            return Ok(book);
        }

        let updated = self.repository.books.add_author(book_id, author.id).await?;
        tracing::info!("Attached author {} to book {}", author.id, book_id);
        Ok(updated)
    }
}
