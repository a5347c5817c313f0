use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Constant,
    Variable,
    Function,
    Type,
    Field,
    Method,
}

impl SymbolKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "const",
            Self::Variable => "var",
            Self::Function => "func",
            Self::Type => "type",
            Self::Field => "field",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build target a symbol declaration applies to.
///
/// The same symbol name may be declared once per target; each declaration is
/// a separate search row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
}

impl BuildContext {
    pub const ALL: &'static str = "all";

    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
        }
    }

    /// Whether this declaration applies to every target.
    pub fn is_all(&self) -> bool {
        self.goos == Self::ALL && self.goarch == Self::ALL
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(Self::ALL, Self::ALL)
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.goos, self.goarch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Import path, e.g. `encoding/json`.
    pub path: String,
    pub module_path: String,
    pub version: String,
    /// Display name, e.g. `json`.
    pub name: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub license_types: Vec<String>,
    pub commit_time: DateTime<Utc>,
    /// Number of distinct importers.
    #[serde(default)]
    pub imported_by_count: u64,
    #[serde(default = "default_redistributable")]
    pub redistributable: bool,
}

const fn default_redistributable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// `Foo`, or `Foo.Bar` for methods and fields.
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub synopsis: String,
    /// Import path of the owning package.
    pub package_path: String,
    #[serde(default)]
    pub build: BuildContext,
}

/// One ranked symbol search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol_name: String,
    pub symbol_kind: SymbolKind,
    pub symbol_synopsis: String,
    pub build: BuildContext,
    pub package_path: String,
    pub module_path: String,
    pub version: String,
    pub package_name: String,
    pub synopsis: String,
    pub license_types: Vec<String>,
    pub commit_time: DateTime<Utc>,
    pub imported_by_count: u64,
    /// Computed relevance. For diagnostics only.
    pub score: f64,
}
