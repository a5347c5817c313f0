//! Runtime configuration: defaults, then the TOML file, then environment overrides.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SYMBOL_SEARCH_CONFIG";
/// Environment override for the corpus snapshot path.
pub const CORPUS_ENV: &str = "SYMBOL_SEARCH_CORPUS";
/// Environment override for the result cap.
pub const MAX_LIMIT_ENV: &str = "SYMBOL_SEARCH_MAX_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON corpus snapshot served by the bundled server.
    pub corpus: Option<PathBuf>,
    /// Result count used when a request does not name one.
    pub default_limit: usize,
    /// Largest result count a request may ask for.
    pub max_limit: usize,
    /// Number of compiled queries kept by the searcher.
    pub cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: None,
            default_limit: 10,
            max_limit: 100,
            cache_size: 128,
        }
    }
}

impl Config {
    /// Load from `$SYMBOL_SEARCH_CONFIG`, else the user config directory.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load() -> Result<Self> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => match default_config_path() {
                Some(path) => Self::from_file_or_default(&path)?,
                None => Self::default(),
            },
        };
        config.with_env_overrides()?.validated()
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse `path` when it exists, otherwise start from the defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(corpus) = std::env::var_os(CORPUS_ENV) {
            self.corpus = Some(PathBuf::from(corpus));
        }
        if let Ok(max) = std::env::var(MAX_LIMIT_ENV) {
            self.max_limit = max
                .parse()
                .with_context(|| format!("{} must be a positive integer, got {:?}", MAX_LIMIT_ENV, max))?;
        }
        Ok(self)
    }

    /// Check invariants and expand `~` in the corpus path.
    pub fn validated(mut self) -> Result<Self> {
        if self.max_limit == 0 {
            bail!("max_limit must be positive");
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            bail!(
                "default_limit must be between 1 and max_limit ({}), got {}",
                self.max_limit,
                self.default_limit
            );
        }
        if self.cache_size == 0 {
            bail!("cache_size must be positive");
        }
        if let Some(corpus) = &self.corpus {
            let expanded = expand_tilde(&corpus.to_string_lossy()).into_owned();
            self.corpus = Some(PathBuf::from(expanded));
        }
        Ok(self)
    }
}

/// `<config dir>/symbol-search/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("symbol-search").join("config.toml"))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
