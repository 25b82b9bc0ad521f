//! Author model and its wire representation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A name made of nothing but spaces (or nothing at all)
static BLANK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ *$").expect("valid blank-name pattern"));

/// Author as stored
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i64,
    pub full_name: String,
}

/// Fields of an author not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    pub full_name: String,
}

impl Author {
    /// Fetch-then-overwrite: keeps the stored identity, takes the incoming name.
    pub fn merge(old: Author, incoming: AuthorDraft) -> Author {
        Author {
            id: old.id,
            full_name: incoming.full_name,
        }
    }
}

/// Author as exchanged over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    /// Identifier, assigned by the server on creation
    #[serde(default)]
    pub id: Option<i64>,
    /// Full name; must contain something other than spaces
    #[serde(default)]
    #[validate(custom(function = "validate_full_name"))]
    #[schema(example = "Victor Hugo")]
    pub full_name: String,
}

fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    if BLANK_NAME.is_match(full_name) {
        return Err(ValidationError::new("blank").with_message("Full name must not be blank".into()));
    }
    Ok(())
}

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self {
            id: Some(author.id),
            full_name: author.full_name.clone(),
        }
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: Some(author.id),
            full_name: author.full_name,
        }
    }
}

impl From<&AuthorDto> for AuthorDraft {
    fn from(dto: &AuthorDto) -> Self {
        Self {
            full_name: dto.full_name.clone(),
        }
    }
}
