//! Symbol search tool handlers.

use crate::corpus::Corpus;
use crate::error::SearchError;
use crate::search::{QueryDescription, Strategy};
use crate::searcher::SymbolSearcher;
use crate::types::SearchResult;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search text: `Marshal`, `json.Marshal`, `http.Client.Do`, or several words like `http server`
    pub query: String,
    /// Maximum number of results to return (default from server config)
    #[serde(default)]
    pub limit: Option<i64>,
    /// Force a query shape instead of detecting it from the text
    #[serde(default)]
    pub strategy: Option<StrategyParam>,
}

/// Query shape selectable by tool callers.
///
/// `bare_symbol` matches a symbol name alone, `qualified_reference` splits
/// `<package>.<symbol>` at the first dot, and `multi_word` matches words
/// against symbol names and package paths.
///
/// Variants carry no doc comments so the schema stays a plain `enum` list.
#[derive(Debug, Clone, Copy, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyParam {
    BareSymbol,
    QualifiedReference,
    MultiWord,
}

impl From<StrategyParam> for Strategy {
    fn from(param: StrategyParam) -> Self {
        match param {
            StrategyParam::BareSymbol => Self::BareSymbol,
            StrategyParam::QualifiedReference => Self::QualifiedReference,
            StrategyParam::MultiWord => Self::MultiWord,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExplainRequest {
    /// Search text to compile
    pub query: String,
    /// Result limit to compile with (default from server config)
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Execute a symbol search and format the results.
pub async fn handle_search<C: Corpus>(
    searcher: &SymbolSearcher<C>,
    default_limit: usize,
    request: SearchRequest,
) -> Result<String, SearchError> {
    let limit = request
        .limit
        .unwrap_or_else(|| i64::try_from(default_limit).unwrap_or(i64::MAX));

    let results = match request.strategy {
        Some(strategy) => {
            searcher
                .search_as(strategy.into(), &request.query, limit)
                .await?
        }
        None => searcher.search(&request.query, limit).await?,
    };

    if results.is_empty() {
        let mut msg = format!("No symbols found for '{}'.\n\n", request.query.trim());
        msg.push_str("Search tips:\n");
        msg.push_str("• Search a bare symbol name like 'Marshal'\n");
        msg.push_str("• Qualify with a package name or import path: 'json.Marshal'\n");
        msg.push_str("• Combine symbol and package words: 'http server'\n");
        if request.query.contains('_') {
            msg.push_str("• Underscored names match exactly: 'A_B' does not match 'A B'\n");
        }
        return Ok(msg);
    }

    Ok(format_search_results(&results, &request.query))
}

/// Compile a query and show its strategy, predicate tree, and SQL rendering.
pub fn handle_explain(
    default_limit: usize,
    request: &ExplainRequest,
) -> Result<String, SearchError> {
    let limit = request
        .limit
        .unwrap_or_else(|| i64::try_from(default_limit).unwrap_or(i64::MAX));
    let description = crate::search::compile(&request.query, limit)?;
    Ok(format_explanation(&description))
}

/// Format search results into a readable string output.
pub fn format_search_results(results: &[SearchResult], query: &str) -> String {
    let mut output = format!("Symbol search results for '{}':\n\n", query.trim());

    for (idx, result) in results.iter().enumerate() {
        let _ = write!(
            output,
            "{}. `{}.{}` ({}) in {}@{}",
            idx + 1,
            result.package_name,
            result.symbol_name,
            result.symbol_kind,
            result.package_path,
            result.version
        );
        if !result.build.is_all() {
            let _ = write!(output, " [{}]", result.build);
        }
        let _ = writeln!(output, " - score: {:.3}", result.score);

        if !result.symbol_synopsis.is_empty() {
            let _ = writeln!(output, "   {}", result.symbol_synopsis.trim());
        }
        let _ = writeln!(
            output,
            "   imported by {} · committed {}",
            result.imported_by_count,
            result.commit_time.format("%Y-%m-%d")
        );

        output.push('\n');
    }

    output
}

fn format_explanation(description: &QueryDescription) -> String {
    let sql = description.to_sql();
    let mut output = format!(
        "Strategy: {}\nLimit: {}\n\nPredicate:\n",
        description.strategy(),
        description.limit
    );
    match serde_json::to_string_pretty(&description.predicate) {
        Ok(json) => output.push_str(&json),
        Err(e) => {
            let _ = write!(output, "<unserializable: {}>", e);
        }
    }
    output.push_str("\n\nSQL:\n");
    output.push_str(&sql.text);
    output.push_str("\n\nParameters:\n");
    for (i, param) in sql.params.iter().enumerate() {
        let _ = writeln!(output, "  ${} = {:?}", i + 1, param);
    }
    output
}
