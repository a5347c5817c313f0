//! Query shape classification.
//!
//! A raw search string is one of three shapes:
//! - `Marshal` → bare symbol
//! - `json.Marshal`, `http.Client.Do` → qualified reference (split at the first dot)
//! - `http server` → multi-word (whitespace wins over dots)

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tokenize::split_words;

/// The three mutually exclusive query shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BareSymbol,
    QualifiedReference,
    MultiWord,
}

impl Strategy {
    /// Pick the shape from the lexical form of the trimmed input.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.contains(char::is_whitespace) {
            Self::MultiWord
        } else if trimmed.contains('.') {
            Self::QualifiedReference
        } else {
            Self::BareSymbol
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BareSymbol => "bare_symbol",
            Self::QualifiedReference => "qualified_reference",
            Self::MultiWord => "multi_word",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw input parsed according to a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ParsedQuery {
    /// `<symbol>` or `<type>.<member>` given without a package.
    BareSymbol { symbol: String },
    /// `<head>.<rest>`: head is a package name or import path, rest a symbol.
    QualifiedReference { head: String, rest: String },
    /// Whitespace-separated words.
    MultiWord { words: Vec<String> },
}

impl ParsedQuery {
    /// Classify and parse raw input.
    pub fn classify(raw: &str) -> Result<Self> {
        Self::parse(Strategy::classify(raw), raw)
    }

    /// Parse raw input as the given strategy.
    ///
    /// The input must have that strategy's shape; there is no fallback to a
    /// different strategy.
    pub fn parse(strategy: Strategy, raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery("query is empty".to_string()));
        }

        match strategy {
            Strategy::BareSymbol => {
                if trimmed.contains(char::is_whitespace) {
                    return Err(SearchError::InvalidQuery(format!(
                        "bare symbol query {:?} contains whitespace",
                        trimmed
                    )));
                }
                Ok(Self::BareSymbol {
                    symbol: trimmed.to_string(),
                })
            }
            Strategy::QualifiedReference => {
                if trimmed.contains(char::is_whitespace) {
                    return Err(SearchError::InvalidQuery(format!(
                        "qualified reference {:?} contains whitespace",
                        trimmed
                    )));
                }
                let (head, rest) = trimmed.split_once('.').ok_or_else(|| {
                    SearchError::InvalidQuery(format!(
                        "qualified reference {:?} has no '.'",
                        trimmed
                    ))
                })?;
                if head.is_empty() {
                    return Err(SearchError::InvalidQuery(format!(
                        "qualified reference {:?} has an empty package",
                        trimmed
                    )));
                }
                if rest.is_empty() {
                    return Err(SearchError::InvalidQuery(format!(
                        "qualified reference {:?} has an empty symbol",
                        trimmed
                    )));
                }
                Ok(Self::QualifiedReference {
                    head: head.to_string(),
                    rest: rest.to_string(),
                })
            }
            Strategy::MultiWord => {
                let words: Vec<String> = split_words(trimmed)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if words.len() < 2 {
                    return Err(SearchError::InvalidQuery(format!(
                        "multi-word query {:?} has a single word",
                        trimmed
                    )));
                }
                Ok(Self::MultiWord { words })
            }
        }
    }

    /// The words matched against symbol names.
    ///
    /// The head of a qualified reference is compared verbatim and is not
    /// included.
    pub fn token_words(&self) -> Vec<&str> {
        match self {
            Self::BareSymbol { symbol } => vec![symbol.as_str()],
            Self::QualifiedReference { rest, .. } => vec![rest.as_str()],
            Self::MultiWord { words } => words.iter().map(String::as_str).collect(),
        }
    }

    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::BareSymbol { .. } => Strategy::BareSymbol,
            Self::QualifiedReference { .. } => Strategy::QualifiedReference,
            Self::MultiWord { .. } => Strategy::MultiWord,
        }
    }
}
