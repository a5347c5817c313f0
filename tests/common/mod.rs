//! Shared test fixtures and utilities for integration tests.
//!
//! # Sample Corpus
//!
//! [`sample_snapshot`] describes a small package index covering every query
//! shape:
//! - `Marshal` in `encoding/json`, `encoding/xml` and a third-party `json`
//!   package with different popularity
//! - two `server` packages with identical path relevance and popularity 5 vs 50
//! - `A` and `A_B` side by side with equal popularity and commit time
//! - a `Getpagesize` declared once per build target
//! - a `Server` whose package only matches `http` through a low tier, so its
//!   score falls under the relevance floor
//!
//! # Available Fixtures
//!
//! - `corpus`: the sample snapshot indexed in memory
//! - `searcher`: a [`SymbolSearcher`] over `corpus`
//!
//! [`TempWorkspace`] provides a temp directory for tests that write snapshot
//! or config files.

use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;
use std::path::{Path, PathBuf};
use symbol_search::{
    BuildContext, MemoryCorpus, Package, Snapshot, Symbol, SymbolKind, SymbolSearcher,
};
use tempfile::TempDir;

/// A temporary directory that is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content and returns its path.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Serializes a snapshot to JSON inside the workspace.
    pub fn write_snapshot(&self, path: &str, snapshot: &Snapshot) -> PathBuf {
        let json = serde_json::to_string_pretty(snapshot).expect("Failed to serialize snapshot");
        self.create_file(path, &json)
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Midnight UTC on the given day of January 2024.
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

pub fn package(path: &str, name: &str, imported_by_count: u64, commit_day: u32) -> Package {
    Package {
        path: path.to_string(),
        module_path: path.to_string(),
        version: "v1.0.0".to_string(),
        name: name.to_string(),
        synopsis: format!("Package {} does things.", name),
        license_types: vec!["BSD-3-Clause".to_string()],
        commit_time: day(commit_day),
        imported_by_count,
        redistributable: true,
    }
}

pub fn symbol(name: &str, kind: SymbolKind, package_path: &str) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind,
        synopsis: format!("{} {}", kind, name),
        package_path: package_path.to_string(),
        build: BuildContext::default(),
    }
}

pub fn sample_snapshot() -> Snapshot {
    let mut linux = symbol("Getpagesize", SymbolKind::Function, "syscall");
    linux.build = BuildContext::new("linux", "amd64");
    let mut darwin = symbol("Getpagesize", SymbolKind::Function, "syscall");
    darwin.build = BuildContext::new("darwin", "arm64");

    Snapshot {
        packages: vec![
            package("encoding/json", "json", 5000, 1),
            package("encoding/xml", "xml", 800, 1),
            package("github.com/segmentio/encoding/json", "json", 50, 20),
            package("net/http", "http", 9000, 1),
            package("example.com/alpha/server", "server", 5, 10),
            package("example.com/beta/server", "server", 50, 10),
            package("example.com/http-tools/x", "x", 0, 30),
            package("example.com/under", "under", 10, 1),
            package("syscall", "syscall", 100, 1),
        ],
        symbols: vec![
            symbol("Marshal", SymbolKind::Function, "encoding/json"),
            symbol("Unmarshal", SymbolKind::Function, "encoding/json"),
            symbol("Decoder.Decode", SymbolKind::Method, "encoding/json"),
            symbol("Marshal", SymbolKind::Function, "encoding/xml"),
            symbol("Marshal", SymbolKind::Function, "github.com/segmentio/encoding/json"),
            symbol("Client", SymbolKind::Type, "net/http"),
            symbol("Client.Do", SymbolKind::Method, "net/http"),
            symbol("ListenAndServe", SymbolKind::Function, "net/http"),
            symbol("Server", SymbolKind::Type, "example.com/alpha/server"),
            symbol("Server", SymbolKind::Type, "example.com/beta/server"),
            symbol("Server", SymbolKind::Type, "example.com/http-tools/x"),
            symbol("A", SymbolKind::Constant, "example.com/under"),
            symbol("A_B", SymbolKind::Constant, "example.com/under"),
            linux,
            darwin,
        ],
    }
}

#[fixture]
pub fn corpus() -> MemoryCorpus {
    symbol_search::tracing::init(tracing::Level::DEBUG);
    MemoryCorpus::from_snapshot(sample_snapshot()).expect("Sample snapshot should index")
}

#[fixture]
pub fn searcher(corpus: MemoryCorpus) -> SymbolSearcher<MemoryCorpus> {
    SymbolSearcher::new(corpus)
}
