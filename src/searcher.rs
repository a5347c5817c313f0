//! Runs compiled symbol queries against a corpus.

use crate::corpus::Corpus;
use crate::error::{Result, SearchError};
use crate::search::{QueryDescription, Strategy, assemble, compile, compile_as, score_rows};
use crate::types::SearchResult;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Default number of compiled descriptions kept in memory.
const DEFAULT_CACHE_SIZE: usize = 128;

type CacheKey = (Option<Strategy>, String, usize);

/// Compiles queries, evaluates them against a corpus, and assembles results.
///
/// Compiled descriptions are cached per (strategy, trimmed query, limit).
/// The cache is the only state here; each search is otherwise independent.
pub struct SymbolSearcher<C> {
    corpus: C,
    max_limit: Option<usize>,
    compiled: Mutex<LruCache<CacheKey, Arc<QueryDescription>>>,
}

impl<C> std::fmt::Debug for SymbolSearcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolSearcher")
            .field("max_limit", &self.max_limit)
            .field("cached_queries", &self.cached_queries())
            .finish_non_exhaustive()
    }
}

impl<C> SymbolSearcher<C> {
    fn cache(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<QueryDescription>>> {
        // The cache holds only immutable descriptions, so a poisoned lock is still usable.
        self.compiled
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of compiled descriptions currently cached.
    pub fn cached_queries(&self) -> usize {
        self.cache().len()
    }
}

impl<C: Corpus> SymbolSearcher<C> {
    pub fn new(corpus: C) -> Self {
        Self::with_cache_size(corpus, DEFAULT_CACHE_SIZE)
    }

    pub fn with_cache_size(corpus: C, cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            corpus,
            max_limit: None,
            compiled: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Reject limits above `max_limit` with `LimitExceeded`.
    #[must_use]
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = Some(max_limit);
        self
    }

    pub const fn corpus(&self) -> &C {
        &self.corpus
    }

    /// Classify `raw`, then search.
    pub async fn search(&self, raw: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let description = self.description(None, raw, limit)?;
        self.run(&description).await
    }

    /// Search with an explicitly chosen strategy.
    pub async fn search_as(
        &self,
        strategy: Strategy,
        raw: &str,
        limit: i64,
    ) -> Result<Vec<SearchResult>> {
        let description = self.description(Some(strategy), raw, limit)?;
        self.run(&description).await
    }

    /// Evaluate a compiled description and assemble the results.
    pub async fn run(&self, description: &QueryDescription) -> Result<Vec<SearchResult>> {
        let start = Instant::now();
        let rows = self.corpus.evaluate(description).await.map_err(|e| {
            tracing::warn!(strategy = %description.strategy(), "Corpus evaluation failed: {}", e);
            SearchError::CorpusUnavailable(e)
        })?;
        let row_count = rows.len();

        let results = assemble(score_rows(&description.score, rows), description.limit);

        tracing::info!(
            strategy = %description.strategy(),
            rows = row_count,
            results = results.len(),
            "Symbol search completed in {:?}",
            start.elapsed()
        );

        Ok(results)
    }

    fn description(
        &self,
        strategy: Option<Strategy>,
        raw: &str,
        limit: i64,
    ) -> Result<Arc<QueryDescription>> {
        if let Some(max) = self.max_limit
            && usize::try_from(limit).is_ok_and(|l| l > max)
        {
            return Err(SearchError::LimitExceeded { limit, max });
        }

        let key = (
            strategy,
            raw.trim().to_string(),
            usize::try_from(limit).unwrap_or(0),
        );
        if let Some(description) = self.cache().get(&key) {
            tracing::debug!("Compiled query cache hit for {:?}", key.1);
            return Ok(Arc::clone(description));
        }

        let description = Arc::new(match strategy {
            Some(strategy) => compile_as(strategy, raw, limit)?,
            None => compile(raw, limit)?,
        });
        self.cache().put(key, Arc::clone(&description));
        Ok(description)
    }
}
