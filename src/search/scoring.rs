//! Search relevance and ranking.
//!
//! This module provides the popularity transform, the weighted lexical rank
//! used for multi-word queries, and the per-strategy score expression.

use serde::{Deserialize, Serialize};
use std::f64::consts::E;

use super::strategy::Strategy;
use super::tokenize::{TokenQuery, WeightedTokens};

/// Rank weights for path tokens, in `[D, C, B, A]` tier order.
pub const PATH_RANK_WEIGHTS: [f64; 4] = [0.1, 0.2, 1.0, 1.0];

/// Divisor applied to every matched term's weight (zeta(2)), as the text
/// search engine does for OR queries.
const RANK_NORMALIZER: f64 = 1.644_934_066_85;

/// Damped popularity multiplier.
///
/// Returns `ln(e + n)`:
/// - 1.0 for a package nobody imports
/// - strictly increasing, sub-linear in `n`
pub fn popularity_weight(imported_by_count: u64) -> f64 {
    (E + imported_by_count as f64).ln()
}

/// Weighted relevance of a path-token set against a query.
///
/// For each distinct query lexeme present in `path_tokens`, adds the weight
/// of the lexeme's tier divided by zeta(2). The sum is divided by the number
/// of distinct query lexemes. Returns 0.0 when nothing overlaps or the query
/// is empty.
pub fn lexical_rank(weights: &[f64; 4], path_tokens: &WeightedTokens, query: &TokenQuery) -> f64 {
    let lexemes = query.lexemes();
    if lexemes.is_empty() {
        return 0.0;
    }

    let matched: f64 = lexemes
        .iter()
        .filter_map(|lexeme| path_tokens.tier(lexeme))
        .map(|tier| weights[tier.index()] / RANK_NORMALIZER)
        .sum();

    matched / lexemes.len() as f64
}

/// How a row's score is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreExpr {
    /// Popularity alone (single-word shapes).
    Popularity,
    /// `lexical_rank(weights, path_tokens, query) * popularity_weight(n)`.
    RankedPopularity { weights: [f64; 4], query: TokenQuery },
}

/// Inputs the score expression needs from a corpus row.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub path_tokens: &'a WeightedTokens,
    pub imported_by_count: u64,
}

impl ScoreExpr {
    /// Score expression for a strategy. `query` is only used by multi-word.
    pub fn for_strategy(strategy: Strategy, query: &TokenQuery) -> Self {
        match strategy {
            Strategy::BareSymbol | Strategy::QualifiedReference => Self::Popularity,
            Strategy::MultiWord => Self::RankedPopularity {
                weights: PATH_RANK_WEIGHTS,
                query: query.clone(),
            },
        }
    }

    pub fn evaluate(&self, inputs: ScoreInputs<'_>) -> f64 {
        let popularity = popularity_weight(inputs.imported_by_count);
        match self {
            Self::Popularity => popularity,
            Self::RankedPopularity { weights, query } => {
                lexical_rank(weights, inputs.path_tokens, query) * popularity
            }
        }
    }
}
