//! Ranked symbol search query compiler.
//!
//! This module classifies raw search text into a query shape, builds the
//! predicate tree and score expression for it, and orders scored rows into
//! the final result list.

// Module declarations
pub mod assemble;
pub mod predicate;
pub mod query;
pub mod scoring;
pub mod sql;
pub mod strategy;
pub mod tokenize;

// Public re-exports (used via lib.rs)
pub use assemble::{SCORE_FLOOR, assemble, compare_results, score_rows};
pub use predicate::{MatchTarget, PackageField, Predicate};
pub use query::{QueryDescription, compile, compile_as};
pub use scoring::{PATH_RANK_WEIGHTS, ScoreExpr, lexical_rank, popularity_weight};
pub use sql::{SqlParam, SqlQuery};
pub use strategy::{ParsedQuery, Strategy};
pub use tokenize::{TokenQuery, normalize};
