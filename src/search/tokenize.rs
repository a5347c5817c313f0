//! Query normalization and lexing into the token form the symbol text index holds.
//!
//! The index treats `_` the same as `/`: both separate words. To keep `A_B`
//! distinct from `A B`, match tokens replace underscores with hyphens before
//! lexing. On the path side a hyphenated word lexes to the compound plus its
//! parts, so `go-yaml` produces `go-yaml`, `go` and `yaml`. Symbol names keep
//! hyphenated compounds whole, so `A_B` is indexed as `a-b` alone and a search
//! for `A` never ranks it above an exact `A`.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replace every underscore with a hyphen.
///
/// Only applied to text used as a match token, never to values compared for
/// exact equality.
pub fn normalize(raw: &str) -> String {
    raw.replace('_', "-")
}

/// Split raw input on runs of whitespace.
pub fn split_words(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Lex a single word into its lexemes.
///
/// The word is lowercased and broken into chunks on whitespace, `/` and `_`.
/// A chunk containing `-` or `.` yields itself followed by its non-empty
/// parts; any other chunk yields itself. Duplicates are dropped while the
/// first occurrence order is kept.
pub fn lex(word: &str) -> Vec<String> {
    lex_with(word, &['-', '.'])
}

/// Lex a word the way symbol names are indexed.
///
/// Like [`lex`], except hyphenated compounds stay whole: `a-b` yields only
/// `a-b`, so a search for `A` cannot reach `A_B`. Dotted compounds still
/// yield their parts, so `Do` finds `Client.Do`.
pub fn lex_name(word: &str) -> Vec<String> {
    lex_with(word, &['.'])
}

fn lex_with(word: &str, part_separators: &[char]) -> Vec<String> {
    let lowered = word.to_lowercase();
    let mut lexemes: Vec<String> = Vec::new();
    let mut push = |lexeme: &str| {
        // A run made only of separators ("-", "..") carries no lexeme.
        if lexeme.chars().all(|c| c == '-' || c == '.') {
            return;
        }
        if !lexemes.iter().any(|l| l == lexeme) {
            lexemes.push(lexeme.to_string());
        }
    };

    for chunk in lowered.split(|c: char| c.is_whitespace() || c == '/' || c == '_') {
        push(chunk);
        if chunk.contains(part_separators) {
            for part in chunk.split(part_separators) {
                push(part);
            }
        }
    }

    lexemes
}

/// Lex text into a token set, as the indexer does for symbol names.
pub fn token_set(text: &str) -> TokenSet {
    TokenSet::from_iter(lex_name(&normalize(text)))
}

/// An unweighted set of lexemes (a symbol's name tokens).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(AHashSet<String>);

impl TokenSet {
    pub fn contains(&self, lexeme: &str) -> bool {
        self.0.contains(lexeme)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Importance tier of a weighted token, lowest first.
///
/// Mirrors the four weight labels of a text-search vector; rank weight
/// vectors are indexed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    D,
    C,
    B,
    A,
}

impl Tier {
    /// Position of this tier inside a `[D, C, B, A]` weight vector.
    pub const fn index(self) -> usize {
        match self {
            Self::D => 0,
            Self::C => 1,
            Self::B => 2,
            Self::A => 3,
        }
    }
}

/// A set of lexemes, each tagged with its highest tier (a package's path tokens).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedTokens(AHashMap<String, Tier>);

impl WeightedTokens {
    /// Insert a lexeme, keeping the highest tier seen for it.
    pub fn insert(&mut self, lexeme: impl Into<String>, tier: Tier) {
        let entry = self.0.entry(lexeme.into()).or_insert(tier);
        if tier > *entry {
            *entry = tier;
        }
    }

    pub fn tier(&self, lexeme: &str) -> Option<Tier> {
        self.0.get(lexeme).copied()
    }

    pub fn contains(&self, lexeme: &str) -> bool {
        self.0.contains_key(lexeme)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Derive the weighted path tokens for a package.
///
/// The last path element and the package name are tier A, other elements
/// tier B, and the host element (the first one, when it contains a `.`)
/// tier C. Parts of dotted or hyphenated elements drop to tier D.
pub fn path_tokens(package_path: &str, package_name: &str) -> WeightedTokens {
    let mut tokens = WeightedTokens::default();
    let elements: Vec<&str> = package_path.split('/').filter(|e| !e.is_empty()).collect();

    for (i, element) in elements.iter().enumerate() {
        let tier = if i + 1 == elements.len() {
            Tier::A
        } else if i == 0 && element.contains('.') {
            Tier::C
        } else {
            Tier::B
        };
        add_element(&mut tokens, element, tier);
    }
    if !package_name.is_empty() {
        add_element(&mut tokens, package_name, Tier::A);
    }

    tokens
}

fn add_element(tokens: &mut WeightedTokens, element: &str, tier: Tier) {
    let normalized = normalize(element);
    let lexemes = lex(&normalized);
    let whole = normalized.to_lowercase();
    for lexeme in lexemes {
        let lexeme_tier = if lexeme == whole { tier } else { Tier::D };
        tokens.insert(lexeme, lexeme_tier);
    }
}

/// A text-search query in disjunctive form.
///
/// Each group holds the lexemes of one query word and matches when all of
/// them are present; the query matches when any group does. For a single
/// plain word this is set intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuery {
    groups: Vec<Vec<String>>,
}

impl TokenQuery {
    /// Query for a single word. The word is normalized before lexing.
    pub fn word(word: &str) -> Self {
        Self::any_of([word])
    }

    /// OR-combination of words. Each word is normalized before lexing;
    /// words that lex to nothing are dropped.
    pub fn any_of<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self::build(words, lex)
    }

    /// Query for a single word against symbol name tokens.
    pub fn name_word(word: &str) -> Self {
        Self::name_any_of([word])
    }

    /// OR-combination of words against symbol name tokens, lexed with
    /// [`lex_name`] so hyphenated compounds only match whole.
    pub fn name_any_of<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self::build(words, lex_name)
    }

    fn build<'a>(
        words: impl IntoIterator<Item = &'a str>,
        lexer: fn(&str) -> Vec<String>,
    ) -> Self {
        let groups = words
            .into_iter()
            .map(|w| lexer(&normalize(w)))
            .filter(|g| !g.is_empty())
            .collect();
        Self { groups }
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Distinct lexemes across all groups, in first-seen order.
    pub fn lexemes(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for lexeme in self.groups.iter().flatten() {
            if !seen.contains(&lexeme.as_str()) {
                seen.push(lexeme);
            }
        }
        seen
    }

    /// Whether a name-token set satisfies this query.
    pub fn matches(&self, tokens: &TokenSet) -> bool {
        self.groups
            .iter()
            .any(|group| group.iter().all(|l| tokens.contains(l)))
    }

    /// Whether a weighted path-token set satisfies this query.
    pub fn matches_weighted(&self, tokens: &WeightedTokens) -> bool {
        self.groups
            .iter()
            .any(|group| group.iter().all(|l| tokens.contains(l)))
    }
}

impl fmt::Display for TokenQuery {
    /// Renders in tsquery syntax, e.g. `'a-b' & 'a' & 'b' | 'server'`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            for (j, lexeme) in group.iter().enumerate() {
                if j > 0 {
                    f.write_str(" & ")?;
                }
                write!(f, "'{}'", lexeme.replace('\'', "''"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("A_B", "A-B")]
    #[case("__init__", "--init--")]
    #[case("no underscores", "no underscores")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        check!(normalize(input) == expected);
    }

    #[rstest]
    #[case("A_B")]
    #[case("a__b_c")]
    #[case("plain")]
    #[case("Москва_日本")]
    fn test_normalize_idempotent(#[case] input: &str) {
        let once = normalize(input);
        check!(normalize(&once) == once);
    }

    #[rstest]
    #[case("Marshal", vec!["marshal"])]
    #[case("A-B", vec!["a-b", "a", "b"])]
    #[case("Type.Method", vec!["type.method", "type", "method"])]
    #[case("net/http", vec!["net", "http"])]
    #[case("snake_case", vec!["snake", "case"])]
    #[case("x-x", vec!["x-x", "x"])]
    #[case("-", vec![])]
    #[case("x.-", vec!["x.-", "x"])]
    fn test_lex(#[case] input: &str, #[case] expected: Vec<&str>) {
        check!(lex(input) == expected);
    }

    #[rstest]
    #[case("A-B", vec!["a-b"])]
    #[case("Client.Do", vec!["client.do", "client", "do"])]
    #[case("a-b.c", vec!["a-b.c", "a-b", "c"])]
    #[case("--", vec![])]
    fn test_lex_name_keeps_hyphen_compounds_whole(
        #[case] input: &str,
        #[case] expected: Vec<&str>,
    ) {
        check!(lex_name(input) == expected);
    }

    #[test]
    fn test_split_words_collapses_whitespace_runs() {
        check!(split_words("  http \t server\n") == vec!["http", "server"]);
        check!(split_words("   ").is_empty());
    }

    #[test]
    fn test_underscore_query_is_distinct_from_spaced_words() {
        let query = TokenQuery::name_word("A_B");
        check!(query.matches(&token_set("A_B")));
        check!(!query.matches(&token_set("A")));
        check!(!query.matches(&token_set("B")));
    }

    #[test]
    fn test_single_word_query_does_not_reach_underscored_names() {
        let query = TokenQuery::name_word("A");
        check!(query.matches(&token_set("A")));
        check!(!query.matches(&token_set("A_B")));
        check!(!query.matches(&token_set("B_A")));
    }

    #[test]
    fn test_single_word_query_matches_dotted_members() {
        let query = TokenQuery::name_word("Do");
        check!(query.matches(&token_set("Client.Do")));
        check!(!query.matches(&token_set("Done")));
    }

    #[test]
    fn test_any_of_matches_any_group() {
        let query = TokenQuery::any_of(["http", "server"]);
        check!(query.matches(&token_set("Server")));
        check!(query.matches(&token_set("HTTP")));
        check!(!query.matches(&token_set("Client")));
        check!(query.lexemes() == vec!["http", "server"]);
    }

    #[test]
    fn test_path_tokens_tiers() {
        let tokens = path_tokens("github.com/foo/go-yaml", "yaml");
        check!(tokens.tier("go-yaml") == Some(Tier::A));
        check!(tokens.tier("yaml") == Some(Tier::A));
        check!(tokens.tier("go") == Some(Tier::D));
        check!(tokens.tier("foo") == Some(Tier::B));
        check!(tokens.tier("github.com") == Some(Tier::C));
        check!(tokens.tier("github") == Some(Tier::D));
    }

    #[test]
    fn test_stdlib_path_tokens() {
        let tokens = path_tokens("net/http", "http");
        check!(tokens.tier("http") == Some(Tier::A));
        check!(tokens.tier("net") == Some(Tier::B));
        check!(tokens.len() == 2);
    }

    #[test]
    fn test_separator_only_words_are_dropped() {
        check!(TokenQuery::name_word("_").is_empty());
        check!(TokenQuery::name_any_of(["-", "."]).is_empty());
        check!(TokenQuery::name_any_of(["-", "server"]).groups().len() == 1);
    }

    #[test]
    fn test_token_query_display() {
        check!(TokenQuery::any_of(["A_B", "server"]).to_string() == "'a-b' & 'a' & 'b' | 'server'");
        check!(TokenQuery::name_any_of(["A_B", "server"]).to_string() == "'a-b' | 'server'");
    }
}
