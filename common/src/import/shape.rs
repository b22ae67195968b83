//! Shape classification of a single cell.
//!
//! The reconciler never looks at raw strings directly; every token is tagged
//! once with a [`TokenShape`] and the heuristics reason on those tags.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Prefixes that mark a value as a paddock / pen rather than a sire name.
pub const PADDOCK_KEYWORDS: [&str; 5] = ["PIQUETE", "PASTO", "RETIRO", "MANGUEIRO", "CURRAL"];

static LEADING_DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}").expect("leading date pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenShape {
    Empty,
    /// Contains a slash or starts like `DD/MM`.
    DateLike,
    /// Only ASCII digits.
    NumericLike,
    /// Name shaped, but starts with a paddock keyword.
    LocationLike,
    /// Letter-containing text longer than two characters.
    NameLike,
    /// Anything else: short codes such as a series letter, decimals, symbols.
    Other,
}

impl TokenShape {
    pub fn is_date_like(self) -> bool {
        self == TokenShape::DateLike
    }

    /// Could this token be a sire name, ignoring paddock prefixes?
    pub fn is_name_candidate(self) -> bool {
        matches!(self, TokenShape::NameLike | TokenShape::LocationLike)
    }
}

pub fn classify(token: &str) -> TokenShape {
    let token = token.trim();
    if token.is_empty() {
        return TokenShape::Empty;
    }
    if token.contains('/') || LEADING_DAY_MONTH.is_match(token) {
        return TokenShape::DateLike;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return TokenShape::NumericLike;
    }
    if token.chars().any(char::is_alphabetic) && token.chars().count() > 2 {
        let upper = token.to_uppercase();
        if PADDOCK_KEYWORDS.iter().any(|k| upper.starts_with(k)) {
            return TokenShape::LocationLike;
        }
        return TokenShape::NameLike;
    }
    TokenShape::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates() {
        assert_eq!(classify("01/01/2024"), TokenShape::DateLike);
        assert_eq!(classify("1/2"), TokenShape::DateLike);
        assert_eq!(classify("IA/TE"), TokenShape::DateLike);
    }

    #[test]
    fn test_numbers_and_short_codes() {
        assert_eq!(classify("123"), TokenShape::NumericLike);
        assert_eq!(classify("A"), TokenShape::Other);
        assert_eq!(classify("A3"), TokenShape::Other);
        assert_eq!(classify("12.5"), TokenShape::Other);
        assert_eq!(classify("   "), TokenShape::Empty);
    }

    #[test]
    fn test_names_and_paddocks() {
        assert_eq!(classify("IDEAL - A3139"), TokenShape::NameLike);
        assert_eq!(classify("Touro A"), TokenShape::NameLike);
        assert_eq!(classify("Piquete 4"), TokenShape::LocationLike);
        assert_eq!(classify("CURRAL NOVO"), TokenShape::LocationLike);
        assert!(TokenShape::LocationLike.is_name_candidate());
        assert!(!TokenShape::Other.is_name_candidate());
    }
}
