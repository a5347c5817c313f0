//! In-memory corpus built from a JSON snapshot.
//!
//! Token sets are derived at load time with the same lexer the query compiler
//! uses, so the corpus behaves like a text index configured for symbols.

use super::{CandidateRow, Corpus};
use crate::error::CorpusError;
use crate::search::predicate::{MatchTarget, PackageField};
use crate::search::tokenize::{TokenSet, WeightedTokens, path_tokens, token_set};
use crate::search::QueryDescription;
use crate::types::{Package, Symbol};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Serialized corpus contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub packages: Vec<Package>,
    pub symbols: Vec<Symbol>,
}

#[derive(Debug)]
struct PackageDocument {
    package: Arc<Package>,
    path_tokens: Arc<WeightedTokens>,
}

#[derive(Debug)]
struct SymbolDocument {
    symbol: Symbol,
    name_tokens: TokenSet,
    package: Arc<PackageDocument>,
}

impl MatchTarget for SymbolDocument {
    fn name_tokens(&self) -> &TokenSet {
        &self.name_tokens
    }

    fn path_tokens(&self) -> &WeightedTokens {
        &self.package.path_tokens
    }

    fn package_field(&self, field: PackageField) -> &str {
        match field {
            PackageField::Name => &self.package.package.name,
            PackageField::Path => &self.package.package.path,
        }
    }
}

/// A read-only corpus held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    documents: Vec<SymbolDocument>,
    package_count: usize,
}

impl MemoryCorpus {
    /// Index a snapshot.
    ///
    /// Fails if a symbol refers to an unknown package, a package path is
    /// listed twice, or any entry produces an empty token set.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, CorpusError> {
        let mut packages: HashMap<String, Arc<PackageDocument>> =
            HashMap::with_capacity(snapshot.packages.len());

        for package in snapshot.packages {
            let tokens = path_tokens(&package.path, &package.name);
            if tokens.is_empty() {
                return Err(CorpusError::InvalidEntry(format!(
                    "package {:?} has no path tokens",
                    package.path
                )));
            }
            let path = package.path.clone();
            let document = Arc::new(PackageDocument {
                package: Arc::new(package),
                path_tokens: Arc::new(tokens),
            });
            if packages.insert(path.clone(), document).is_some() {
                return Err(CorpusError::InvalidEntry(format!(
                    "package {:?} is listed more than once",
                    path
                )));
            }
        }

        let mut documents = Vec::with_capacity(snapshot.symbols.len());
        for symbol in snapshot.symbols {
            let package = packages.get(&symbol.package_path).cloned().ok_or_else(|| {
                CorpusError::InvalidEntry(format!(
                    "symbol {:?} refers to unknown package {:?}",
                    symbol.name, symbol.package_path
                ))
            })?;
            let name_tokens = token_set(&symbol.name);
            if name_tokens.is_empty() {
                return Err(CorpusError::InvalidEntry(format!(
                    "symbol {:?} in {:?} has no name tokens",
                    symbol.name, symbol.package_path
                )));
            }
            documents.push(SymbolDocument {
                symbol,
                name_tokens,
                package,
            });
        }

        tracing::info!(
            "Indexed symbol corpus: {} packages, {} symbol rows",
            packages.len(),
            documents.len()
        );

        Ok(Self {
            documents,
            package_count: packages.len(),
        })
    }

    /// Load and index a JSON snapshot file.
    pub async fn load(path: &Path) -> Result<Self, CorpusError> {
        let bytes = tokio::fs::read(path).await?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| CorpusError::Snapshot {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        tracing::debug!("Loaded corpus snapshot from {}", path.display());
        Self::from_snapshot(snapshot)
    }

    /// Number of symbol rows (one per build target declaration).
    pub fn row_count(&self) -> usize {
        self.documents.len()
    }

    pub fn package_count(&self) -> usize {
        self.package_count
    }

    fn matching_rows(&self, query: &QueryDescription) -> Vec<CandidateRow> {
        self.documents
            .iter()
            .filter(|doc| query.predicate.evaluate(*doc))
            .map(|doc| CandidateRow {
                symbol: doc.symbol.clone(),
                package: Arc::clone(&doc.package.package),
                path_tokens: Arc::clone(&doc.package.path_tokens),
            })
            .collect()
    }
}

impl Corpus for MemoryCorpus {
    fn evaluate<'a>(
        &'a self,
        query: &'a QueryDescription,
    ) -> BoxFuture<'a, Result<Vec<CandidateRow>, CorpusError>> {
        async move { Ok::<_, CorpusError>(self.matching_rows(query)) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::compile;
    use crate::types::{BuildContext, SymbolKind};
    use assert2::{check, let_assert};
    use chrono::{TimeZone, Utc};

    fn package(path: &str, name: &str) -> Package {
        Package {
            path: path.to_string(),
            module_path: path.to_string(),
            version: "v1.0.0".to_string(),
            name: name.to_string(),
            synopsis: String::new(),
            license_types: vec!["MIT".to_string()],
            commit_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            imported_by_count: 0,
            redistributable: true,
        }
    }

    fn symbol(name: &str, package_path: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            synopsis: format!("func {}()", name),
            package_path: package_path.to_string(),
            build: BuildContext::default(),
        }
    }

    #[test]
    fn test_unknown_package_rejected() {
        let snapshot = Snapshot {
            packages: vec![],
            symbols: vec![symbol("Marshal", "encoding/json")],
        };
        let_assert!(Err(CorpusError::InvalidEntry(_)) = MemoryCorpus::from_snapshot(snapshot));
    }

    #[test]
    fn test_duplicate_package_rejected() {
        let snapshot = Snapshot {
            packages: vec![package("encoding/json", "json"), package("encoding/json", "json")],
            symbols: vec![],
        };
        let_assert!(Err(CorpusError::InvalidEntry(_)) = MemoryCorpus::from_snapshot(snapshot));
    }

    #[test]
    fn test_empty_symbol_name_rejected() {
        let snapshot = Snapshot {
            packages: vec![package("encoding/json", "json")],
            symbols: vec![symbol("_", "encoding/json")],
        };
        let_assert!(Err(CorpusError::InvalidEntry(_)) = MemoryCorpus::from_snapshot(snapshot));
    }

    #[tokio::test]
    async fn test_build_variants_are_separate_rows() {
        let mut linux = symbol("Getpagesize", "syscall");
        linux.build = BuildContext::new("linux", "amd64");
        let mut darwin = symbol("Getpagesize", "syscall");
        darwin.build = BuildContext::new("darwin", "arm64");

        let corpus = MemoryCorpus::from_snapshot(Snapshot {
            packages: vec![package("syscall", "syscall")],
            symbols: vec![linux, darwin],
        })
        .unwrap();

        let query = compile("Getpagesize", 10).unwrap();
        let rows = corpus.evaluate(&query).await.unwrap();
        check!(rows.len() == 2);
        check!(corpus.row_count() == 2);
        check!(corpus.package_count() == 1);
    }

    #[tokio::test]
    async fn test_rows_satisfy_predicate() {
        let corpus = MemoryCorpus::from_snapshot(Snapshot {
            packages: vec![package("encoding/json", "json"), package("encoding/xml", "xml")],
            symbols: vec![
                symbol("Marshal", "encoding/json"),
                symbol("Marshal", "encoding/xml"),
                symbol("Unmarshal", "encoding/json"),
            ],
        })
        .unwrap();

        let query = compile("json.Marshal", 5).unwrap();
        let rows = corpus.evaluate(&query).await.unwrap();
        check!(rows.len() == 1);
        check!(rows[0].package.path == "encoding/json");
        check!(rows[0].symbol.name == "Marshal");
    }
}
