//! Turns scored corpus rows into the final ordered result list.

use crate::corpus::CandidateRow;
use crate::types::SearchResult;
use std::cmp::Ordering;

use super::scoring::{ScoreExpr, ScoreInputs};

/// Rows scoring at or below this are dropped.
pub const SCORE_FLOOR: f64 = 0.1;

/// Score each row with `expr` and flatten it into a result record.
pub fn score_rows(expr: &ScoreExpr, rows: Vec<CandidateRow>) -> Vec<SearchResult> {
    rows.into_iter()
        .map(|row| {
            let score = expr.evaluate(ScoreInputs {
                path_tokens: &row.path_tokens,
                imported_by_count: row.package.imported_by_count,
            });
            let package = &row.package;
            SearchResult {
                symbol_name: row.symbol.name,
                symbol_kind: row.symbol.kind,
                symbol_synopsis: row.symbol.synopsis,
                build: row.symbol.build,
                package_path: package.path.clone(),
                module_path: package.module_path.clone(),
                version: package.version.clone(),
                package_name: package.name.clone(),
                synopsis: package.synopsis.clone(),
                license_types: package.license_types.clone(),
                commit_time: package.commit_time,
                imported_by_count: package.imported_by_count,
                score,
            }
        })
        .collect()
}

/// Result ordering: score desc, commit time desc, symbol name asc, package
/// path asc, then build target asc so variants of one symbol stay stable.
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.commit_time.cmp(&a.commit_time))
        .then_with(|| a.symbol_name.cmp(&b.symbol_name))
        .then_with(|| a.package_path.cmp(&b.package_path))
        .then_with(|| a.build.cmp(&b.build))
}

/// Apply the score floor, sort, and truncate to `limit`.
pub fn assemble(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    let before = results.len();
    // NaN never passes the floor.
    results.retain(|r| r.score > SCORE_FLOOR);
    results.sort_by(compare_results);
    results.truncate(limit);

    tracing::debug!(
        "Assembled {} results from {} rows (limit {})",
        results.len(),
        before,
        limit
    );

    results
}
