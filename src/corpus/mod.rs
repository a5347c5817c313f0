//! The corpus collaborator: evaluates compiled queries against indexed symbols.

pub mod memory;

pub use memory::{MemoryCorpus, Snapshot};

use crate::error::CorpusError;
use crate::search::QueryDescription;
use crate::search::tokenize::WeightedTokens;
use crate::types::{Package, Symbol};
use futures::future::BoxFuture;
use std::sync::Arc;

/// A (symbol, package, build target) row that satisfied a query predicate.
///
/// Carries what the score expression needs (path tokens, popularity) and
/// what the result record reports.
#[derive(Debug, Clone)]
pub struct CandidateRow {
    pub symbol: Symbol,
    pub package: Arc<Package>,
    pub path_tokens: Arc<WeightedTokens>,
}

/// Evaluates a query description against a read-only corpus snapshot.
///
/// One call is one round trip: no partial results and no retries. Failures
/// are returned as-is for the caller to surface.
pub trait Corpus: Send + Sync {
    fn evaluate<'a>(
        &'a self,
        query: &'a QueryDescription,
    ) -> BoxFuture<'a, Result<Vec<CandidateRow>, CorpusError>>;
}

impl<C: Corpus + ?Sized> Corpus for Arc<C> {
    fn evaluate<'a>(
        &'a self,
        query: &'a QueryDescription,
    ) -> BoxFuture<'a, Result<Vec<CandidateRow>, CorpusError>> {
        (**self).evaluate(query)
    }
}
