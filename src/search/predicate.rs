//! Predicate trees over (package, symbol) corpus rows.
//!
//! Builders here only decide which atomic matches to combine for each
//! strategy. Evaluation is left to the corpus collaborator through the
//! [`MatchTarget`] view, so no ranking logic lives in this layer.

use serde::{Deserialize, Serialize};

use super::strategy::ParsedQuery;
use super::tokenize::{TokenQuery, TokenSet, WeightedTokens};

/// Package columns usable in an exact comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageField {
    /// Display name of the package (`json`).
    Name,
    /// Import path of the package (`encoding/json`).
    Path,
}

/// A boolean predicate over a corpus row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    And { all: Vec<Predicate> },
    Or { any: Vec<Predicate> },
    /// The symbol's name-token set satisfies the token query.
    NameTokenMatch { query: TokenQuery },
    /// The package's path-token set satisfies the token query.
    PathTokenMatch { query: TokenQuery },
    /// Case-sensitive equality on a package field.
    ExactFieldMatch { field: PackageField, literal: String },
}

/// Read-only view of a corpus row used to evaluate predicates.
pub trait MatchTarget {
    fn name_tokens(&self) -> &TokenSet;
    fn path_tokens(&self) -> &WeightedTokens;
    fn package_field(&self, field: PackageField) -> &str;
}

impl Predicate {
    /// Build the predicate for a parsed query.
    pub fn for_query(parsed: &ParsedQuery) -> Self {
        match parsed {
            ParsedQuery::BareSymbol { symbol } => Self::bare_symbol(symbol),
            ParsedQuery::QualifiedReference { head, rest } => Self::qualified_reference(head, rest),
            ParsedQuery::MultiWord { words } => {
                Self::multi_word(&words.iter().map(String::as_str).collect::<Vec<_>>())
            }
        }
    }

    /// `<symbol>`: the name tokens must match the normalized symbol.
    pub fn bare_symbol(symbol: &str) -> Self {
        Self::NameTokenMatch {
            query: TokenQuery::name_word(symbol),
        }
    }

    /// `<head>.<rest>`: the package name or path equals `head` exactly, and
    /// the name tokens match the normalized `rest`.
    pub fn qualified_reference(head: &str, rest: &str) -> Self {
        Self::And {
            all: vec![
                Self::Or {
                    any: vec![
                        Self::ExactFieldMatch {
                            field: PackageField::Name,
                            literal: head.to_string(),
                        },
                        Self::ExactFieldMatch {
                            field: PackageField::Path,
                            literal: head.to_string(),
                        },
                    ],
                },
                Self::NameTokenMatch {
                    query: TokenQuery::name_word(rest),
                },
            ],
        }
    }

    /// Whitespace-separated words: some word matches the symbol name and some
    /// word (possibly another one) matches the package path.
    pub fn multi_word(words: &[&str]) -> Self {
        Self::And {
            all: vec![
                Self::NameTokenMatch {
                    query: TokenQuery::name_any_of(words.iter().copied()),
                },
                Self::PathTokenMatch {
                    query: TokenQuery::any_of(words.iter().copied()),
                },
            ],
        }
    }

    /// Evaluate against a row.
    pub fn evaluate(&self, target: &impl MatchTarget) -> bool {
        match self {
            Self::And { all } => all.iter().all(|p| p.evaluate(target)),
            Self::Or { any } => any.iter().any(|p| p.evaluate(target)),
            Self::NameTokenMatch { query } => query.matches(target.name_tokens()),
            Self::PathTokenMatch { query } => query.matches_weighted(target.path_tokens()),
            Self::ExactFieldMatch { field, literal } => {
                target.package_field(*field) == literal.as_str()
            }
        }
    }
}
