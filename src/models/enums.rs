//! Shared domain enums

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Language a book is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    French,
    English,
}

impl Language {
    /// Lowercase code used on the wire and in the `books.language` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::French => "french",
            Language::English => "english",
        }
    }
}

/// Case-insensitive: `"FRENCH"`, `"French"` and `"french"` are all accepted.
impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "french" => Ok(Language::French),
            "english" => Ok(Language::English),
            _ => Err(format!("Unknown language '{}'", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case() {
        assert_eq!("FRENCH".parse::<Language>(), Ok(Language::French));
        assert_eq!(" English ".parse::<Language>(), Ok(Language::English));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        let json = serde_json::to_string(&Language::English).unwrap();
        assert_eq!(json, format!("\"{}\"", Language::English));
    }
}
