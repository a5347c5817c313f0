//! Compiles raw search text into an executable query description.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

use super::predicate::Predicate;
use super::scoring::ScoreExpr;
use super::strategy::{ParsedQuery, Strategy};
use super::tokenize::TokenQuery;

/// A strategy-tagged query ready for evaluation against a corpus.
///
/// Holds the predicate tree rows must satisfy, the score expression applied
/// to each matching row, and the number of results wanted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescription {
    pub parsed: ParsedQuery,
    pub predicate: Predicate,
    pub score: ScoreExpr,
    pub limit: usize,
}

impl QueryDescription {
    pub const fn strategy(&self) -> Strategy {
        self.parsed.strategy()
    }

    /// Build the description for an already-parsed query.
    pub fn from_parsed(parsed: ParsedQuery, limit: usize) -> Self {
        let predicate = Predicate::for_query(&parsed);
        let score = match &parsed {
            ParsedQuery::MultiWord { words } => ScoreExpr::for_strategy(
                Strategy::MultiWord,
                &TokenQuery::any_of(words.iter().map(String::as_str)),
            ),
            ParsedQuery::BareSymbol { .. } | ParsedQuery::QualifiedReference { .. } => {
                ScoreExpr::Popularity
            }
        };

        Self {
            parsed,
            predicate,
            score,
            limit,
        }
    }
}

/// Classify `raw` and compile it.
pub fn compile(raw: &str, limit: i64) -> Result<QueryDescription> {
    compile_as(Strategy::classify(raw), raw, limit)
}

/// Compile `raw` as an explicitly chosen strategy.
pub fn compile_as(strategy: Strategy, raw: &str, limit: i64) -> Result<QueryDescription> {
    let limit = validate_limit(limit)?;
    let parsed = ParsedQuery::parse(strategy, raw)?;
    if TokenQuery::name_any_of(parsed.token_words()).is_empty() {
        return Err(SearchError::InvalidQuery(format!(
            "query {:?} has no searchable words",
            raw.trim()
        )));
    }
    let description = QueryDescription::from_parsed(parsed, limit);

    tracing::debug!(
        strategy = %description.strategy(),
        limit,
        "Compiled symbol search query {:?}",
        raw.trim()
    );

    Ok(description)
}

fn validate_limit(limit: i64) -> Result<usize> {
    if limit <= 0 {
        return Err(SearchError::InvalidLimit(limit));
    }
    usize::try_from(limit).map_err(|_| SearchError::InvalidLimit(limit))
}
