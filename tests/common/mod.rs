//! Common test utilities
//!
//! Builds the real router on top of the in-memory store and drives it
//! without a network socket.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use library_server::{
    api::create_router, repository::Repository, services::Services, AppState,
};

/// Test application with a fresh, empty store
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Services::new(Repository::in_memory()));
        Self {
            router: create_router(state),
        }
    }

    /// Send a request and return the status with the decoded JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create an author and return its id
    pub async fn create_author(&self, full_name: &str) -> i64 {
        let (status, body) = self
            .post("/api/v1/authors", serde_json::json!({ "fullName": full_name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("author id")
    }

    /// Create a valid book for an author and return its id
    pub async fn create_book(&self, author_id: i64, title: &str) -> i64 {
        let (status, body) = self
            .post(
                &format!("/api/v1/authors/{}/books", author_id),
                serde_json::json!({
                    "title": title,
                    "isbn": 9782070409228i64,
                    "publisher": "Gallimard",
                    "year": 1862,
                    "language": "french"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("book id")
    }
}
