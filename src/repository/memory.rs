//! In-memory store implementing both repositories

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorRepository, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, Book, BookDraft},
};

#[derive(Debug, Default)]
struct Store {
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, BookDraft>,
    /// (book_id, author_id)
    links: BTreeSet<(i64, i64)>,
    last_author_id: i64,
    last_book_id: i64,
}

impl Store {
    fn assemble(&self, book_id: i64) -> Option<Book> {
        let draft = self.books.get(&book_id)?;
        let authors = self
            .links
            .range((book_id, i64::MIN)..=(book_id, i64::MAX))
            .filter_map(|(_, author_id)| self.authors.get(author_id).cloned())
            .collect();
        Some(Book::from_draft(book_id, draft.clone(), authors))
    }

    fn assemble_all<I: IntoIterator<Item = i64>>(&self, ids: I) -> Vec<Book> {
        ids.into_iter().filter_map(|id| self.assemble(id)).collect()
    }
}

/// Shared, cloneable in-memory backend. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    store: Arc<RwLock<Store>>,
}

#[async_trait]
impl AuthorRepository for MemoryRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        Ok(self.store.read().await.authors.values().cloned().collect())
    }

    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Author>> {
        let needle = query.to_lowercase();
        Ok(self
            .store
            .read()
            .await
            .authors
            .values()
            .filter(|a| a.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.store.read().await.authors.get(&id).cloned())
    }

    async fn create(&self, draft: &AuthorDraft) -> AppResult<Author> {
        let mut store = self.store.write().await;
        store.last_author_id += 1;
        let author = Author {
            id: store.last_author_id,
            full_name: draft.full_name.clone(),
        };
        store.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, author: &Author) -> AppResult<Author> {
        let mut store = self.store.write().await;
        let stored = store
            .authors
            .get_mut(&author.id)
            .ok_or(AppError::AuthorNotFound(author.id))?;
        *stored = author.clone();
        Ok(author.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut store = self.store.write().await;
        if store.links.iter().any(|(_, author_id)| *author_id == id) {
            return Err(AppError::AuthorHasBooks(id));
        }
        store.authors.remove(&id).ok_or(AppError::AuthorNotFound(id))?;
        Ok(())
    }

    async fn count_books(&self, id: i64) -> AppResult<i64> {
        let store = self.store.read().await;
        Ok(store.links.iter().filter(|(_, author_id)| *author_id == id).count() as i64)
    }
}

#[async_trait]
impl BookRepository for MemoryRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let store = self.store.read().await;
        Ok(store.assemble_all(store.books.keys().copied()))
    }

    async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let store = self.store.read().await;
        let ids: BTreeSet<i64> = store
            .links
            .iter()
            .filter(|(_, a)| *a == author_id)
            .map(|(b, _)| *b)
            .collect();
        Ok(store.assemble_all(ids))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.store.read().await.assemble(id))
    }

    async fn create(&self, draft: &BookDraft, author_id: i64) -> AppResult<Book> {
        let mut store = self.store.write().await;
        if !store.authors.contains_key(&author_id) {
            return Err(AppError::AuthorNotFound(author_id));
        }

        store.last_book_id += 1;
        let id = store.last_book_id;
        store.books.insert(id, draft.clone());
        store.links.insert((id, author_id));
        store
            .assemble(id)
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", id)))
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        let mut store = self.store.write().await;
        if !store.books.contains_key(&book.id) {
            return Err(AppError::BookNotFound(book.id));
        }

        let draft = BookDraft {
            title: book.title.clone(),
            isbn: book.isbn,
            publisher: book.publisher.clone(),
            year: book.year,
            language: book.language,
        };
        store.books.insert(book.id, draft);
        store
            .assemble(book.id)
            .ok_or(AppError::BookNotFound(book.id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.books.remove(&id).ok_or(AppError::BookNotFound(id))?;
        store.links.retain(|(b, _)| *b != id);
        Ok(())
    }

    async fn add_author(&self, book_id: i64, author_id: i64) -> AppResult<Book> {
        let mut store = self.store.write().await;
        if !store.books.contains_key(&book_id) {
            return Err(AppError::BookNotFound(book_id));
        }
        if !store.authors.contains_key(&author_id) {
            return Err(AppError::AuthorNotFound(author_id));
        }
        store.links.insert((book_id, author_id));
        store.assemble(book_id).ok_or(AppError::BookNotFound(book_id))
    }
}
