//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod enums;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorDto};
pub use book::{Book, BookDraft, BookDto, SearchQuery};
pub use enums::Language;
