//! Author management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, AuthorDto, Book},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all authors, or only those whose name contains `query`
    pub async fn list(&self, query: Option<&str>) -> AppResult<Vec<Author>> {
        match query {
            Some(query) => self.repository.authors.search_by_name(query).await,
            None => self.repository.authors.list().await,
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Author> {
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or(AppError::AuthorNotFound(id))
    }

    /// Create an author; the full name must not be blank
    pub async fn create(&self, author: &AuthorDto) -> AppResult<Author> {
        author.validate()?;

        let created = self.repository.authors.create(&AuthorDraft::from(author)).await?;
        tracing::info!("Created author {} ({})", created.id, created.full_name);
        Ok(created)
    }

    /// Overwrite the name of an existing author. The body must carry the same
    /// id as the path.
    pub async fn update(&self, id: i64, author: &AuthorDto) -> AppResult<Author> {
        if author.id != Some(id) {
            tracing::debug!("Rejected author update: path id {} vs body id {:?}", id, author.id);
            return Err(AppError::IdMismatch { path: id, body: author.id });
        }
        author.validate()?;

        let old = self.get(id).await?;
        let merged = Author::merge(old, AuthorDraft::from(author));
        let updated = self.repository.authors.update(&merged).await?;
        tracing::info!("Updated author {}", updated.id);
        Ok(updated)
    }

    /// Delete an author who no longer has any book
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;

        let books = self.repository.authors.count_books(id).await?;
        if books > 0 {
            tracing::warn!("Refused to delete author {}: {} book(s) still attached", id, books);
            return Err(AppError::AuthorHasBooks(id));
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    /// Books written by an existing author
    pub async fn books(&self, id: i64) -> AppResult<Vec<Book>> {
        self.get(id).await?;
        self.repository.books.list_by_author(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::BookDraft,
        repository::{MockAuthorRepository, MockBookRepository},
    };

    fn dto(id: Option<i64>, full_name: &str) -> AuthorDto {
        AuthorDto {
            id,
            full_name: full_name.to_string(),
        }
    }

    fn service() -> (AuthorsService, Repository) {
        let repository = Repository::in_memory();
        (AuthorsService::new(repository.clone()), repository)
    }

    #[tokio::test]
    async fn create_assigns_an_id() {
        let (service, _) = service();
        let author = service.create(&dto(None, "Victor Hugo")).await.unwrap();
        assert_eq!(author.id, 1);
        assert_eq!(service.get(1).await.unwrap(), author);
    }

    #[tokio::test]
    async fn create_rejects_blank_names() {
        let (service, _) = service();
        for name in ["", "   "] {
            assert!(matches!(
                service.create(&dto(None, name)).await,
                Err(AppError::Validation(_))
            ));
        }
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_name() {
        let (service, _) = service();
        service.create(&dto(None, "Victor Hugo")).await.unwrap();
        service.create(&dto(None, "George Sand")).await.unwrap();

        assert_eq!(service.list(None).await.unwrap().len(), 2);
        let found = service.list(Some("sand")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "George Sand");
    }

    #[tokio::test]
    async fn get_missing_author_is_not_found() {
        let (service, _) = service();
        assert!(matches!(service.get(42).await, Err(AppError::AuthorNotFound(42))));
    }

    #[tokio::test]
    async fn update_overwrites_the_name() {
        let (service, _) = service();
        let author = service.create(&dto(None, "V. Hugo")).await.unwrap();

        let updated = service
            .update(author.id, &dto(Some(author.id), "Victor Hugo"))
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Victor Hugo");
        assert_eq!(service.get(author.id).await.unwrap().full_name, "Victor Hugo");
    }

    #[tokio::test]
    async fn update_of_missing_author_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.update(8, &dto(Some(8), "Nobody")).await,
            Err(AppError::AuthorNotFound(8))
        ));
    }

    #[tokio::test]
    async fn update_with_mismatched_id_never_reaches_the_store() {
        // Mocks without expectations panic on any call.
        let repository = Repository::from_parts(
            Arc::new(MockAuthorRepository::new()),
            Arc::new(MockBookRepository::new()),
        );
        let service = AuthorsService::new(repository);

        assert!(matches!(
            service.update(1, &dto(Some(2), "Victor Hugo")).await,
            Err(AppError::IdMismatch { path: 1, body: Some(2) })
        ));
        assert!(matches!(
            service.update(1, &dto(None, "Victor Hugo")).await,
            Err(AppError::IdMismatch { path: 1, body: None })
        ));
    }

    #[tokio::test]
    async fn delete_without_books_succeeds() {
        let (service, _) = service();
        let author = service.create(&dto(None, "Victor Hugo")).await.unwrap();

        service.delete(author.id).await.unwrap();
        assert!(matches!(
            service.get(author.id).await,
            Err(AppError::AuthorNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_with_books_is_refused() {
        let (service, repository) = service();
        let author = service.create(&dto(None, "Victor Hugo")).await.unwrap();
        let draft = BookDraft {
            title: "Les Misérables".into(),
            isbn: 9_782_070_409_228,
            publisher: None,
            year: 1862,
            language: None,
        };
        repository.books.create(&draft, author.id).await.unwrap();

        assert!(matches!(
            service.delete(author.id).await,
            Err(AppError::AuthorHasBooks(_))
        ));
        assert!(service.get(author.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_with_books_never_calls_delete() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|id| {
            Ok(Some(Author {
                id,
                full_name: "Victor Hugo".into(),
            }))
        });
        authors.expect_count_books().returning(|_| Ok(3));
        authors.expect_delete().never();

        let service = AuthorsService::new(Repository::from_parts(
            Arc::new(authors),
            Arc::new(MockBookRepository::new()),
        ));
        assert!(matches!(service.delete(1).await, Err(AppError::AuthorHasBooks(1))));
    }

    #[tokio::test]
    async fn delete_missing_author_is_not_found() {
        let (service, _) = service();
        assert!(matches!(service.delete(5).await, Err(AppError::AuthorNotFound(5))));
    }

    #[tokio::test]
    async fn books_of_missing_author_is_not_found() {
        let (service, _) = service();
        assert!(matches!(service.books(5).await, Err(AppError::AuthorNotFound(5))));
    }
}
