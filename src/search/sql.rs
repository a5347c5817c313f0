//! PostgreSQL rendering of a query description.
//!
//! Targets the symbol search tables: `symbol_search_documents` (one row per
//! symbol declaration and build target), `search_documents` (package-level
//! fields and `tsv_path_tokens`), `symbol_names` (`tsv_name_tokens`) and
//! `package_symbols` (kind and synopsis). Token queries are bound as
//! already-normalized tsquery text, so the SQL needs no `replace()` calls.

use super::assemble::SCORE_FLOOR;
use super::predicate::{PackageField, Predicate};
use super::query::QueryDescription;
use super::scoring::ScoreExpr;
use super::tokenize::TokenQuery;

/// Name of the text search configuration used for symbol tokens.
pub const TEXT_SEARCH_CONFIGURATION: &str = "symbols";

const POPULARITY_SQL: &str = "ln(exp(1)+sd.imported_by_count)";

/// A bind parameter, in placeholder order (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// Rendered SQL text plus its bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<SqlParam>,
}

#[derive(Default)]
struct Binder {
    params: Vec<SqlParam>,
}

impl Binder {
    /// Bind a value, reusing the placeholder of an identical earlier value.
    fn bind(&mut self, param: SqlParam) -> String {
        let index = match self.params.iter().position(|p| *p == param) {
            Some(i) => i,
            None => {
                self.params.push(param);
                self.params.len() - 1
            }
        };
        format!("${}", index + 1)
    }

    fn tsquery(&mut self, query: &TokenQuery) -> String {
        let placeholder = self.bind(SqlParam::Text(query.to_string()));
        format!("to_tsquery('{}', {})", TEXT_SEARCH_CONFIGURATION, placeholder)
    }
}

impl QueryDescription {
    /// Render as a single PostgreSQL statement.
    pub fn to_sql(&self) -> SqlQuery {
        let mut binder = Binder::default();
        let score = render_score(&self.score, &mut binder);
        let filter = render_predicate(&self.predicate, &mut binder);
        let limit = binder.bind(SqlParam::Int(
            i64::try_from(self.limit).unwrap_or(i64::MAX),
        ));

        let text = format!(
            "WITH results AS (
	SELECT
		s.name AS symbol_name,
		sd.package_path,
		sd.module_path,
		sd.version,
		sd.name AS package_name,
		sd.synopsis,
		sd.license_types,
		sd.commit_time,
		sd.imported_by_count,
		ssd.package_symbol_id,
		ssd.goos,
		ssd.goarch,
		{score} AS score
	FROM symbol_search_documents ssd
	INNER JOIN search_documents sd ON sd.unit_id = ssd.unit_id
	INNER JOIN symbol_names s ON s.id = ssd.symbol_name_id
	WHERE {filter}
)
SELECT
	r.symbol_name,
	r.package_path,
	r.module_path,
	r.version,
	r.package_name,
	r.synopsis,
	r.license_types,
	r.commit_time,
	r.imported_by_count,
	r.goos,
	r.goarch,
	ps.type AS symbol_type,
	ps.synopsis AS symbol_synopsis
FROM results r
INNER JOIN package_symbols ps ON r.package_symbol_id = ps.id
WHERE r.score > {SCORE_FLOOR}
ORDER BY
	score DESC,
	commit_time DESC,
	symbol_name,
	package_path,
	goos,
	goarch
LIMIT {limit};"
        );

        SqlQuery {
            text,
            params: binder.params,
        }
    }
}

fn render_score(expr: &ScoreExpr, binder: &mut Binder) -> String {
    match expr {
        ScoreExpr::Popularity => POPULARITY_SQL.to_string(),
        ScoreExpr::RankedPopularity { weights, query } => {
            let weights = weights
                .iter()
                .map(|w| format!("{:?}", w))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "ts_rank('{{{}}}', sd.tsv_path_tokens, {}) * {}",
                weights,
                binder.tsquery(query),
                POPULARITY_SQL
            )
        }
    }
}

fn render_predicate(predicate: &Predicate, binder: &mut Binder) -> String {
    match predicate {
        Predicate::And { all } => join(all, " AND ", binder),
        Predicate::Or { any } => join(any, " OR ", binder),
        Predicate::NameTokenMatch { query } => {
            format!("s.tsv_name_tokens @@ {}", binder.tsquery(query))
        }
        Predicate::PathTokenMatch { query } => {
            format!("sd.tsv_path_tokens @@ {}", binder.tsquery(query))
        }
        Predicate::ExactFieldMatch { field, literal } => {
            let column = match field {
                PackageField::Name => "sd.name",
                PackageField::Path => "sd.package_path",
            };
            format!("{}={}", column, binder.bind(SqlParam::Text(literal.clone())))
        }
    }
}

fn join(children: &[Predicate], separator: &str, binder: &mut Binder) -> String {
    let parts: Vec<String> = children
        .iter()
        .map(|child| render_predicate(child, binder))
        .collect();
    format!("({})", parts.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::compile;
    use assert2::check;

    #[test]
    fn test_bare_symbol_sql() {
        let sql = compile("A_B", 10).unwrap().to_sql();
        check!(sql.text.contains("s.tsv_name_tokens @@ to_tsquery('symbols', $1)"));
        check!(sql.text.contains("ln(exp(1)+sd.imported_by_count) AS score"));
        check!(sql.text.contains("LIMIT $2;"));
        check!(
            sql.params
                == vec![
                    SqlParam::Text("'a-b'".to_string()),
                    SqlParam::Int(10)
                ]
        );
    }

    #[test]
    fn test_qualified_reference_binds_head_once() {
        let sql = compile("json.Marshal", 5).unwrap().to_sql();
        check!(sql.text.contains("((sd.name=$1 OR sd.package_path=$1) AND s.tsv_name_tokens @@ to_tsquery('symbols', $2))"));
        check!(sql.params[0] == SqlParam::Text("json".to_string()));
        check!(sql.params[1] == SqlParam::Text("'marshal'".to_string()));
        check!(sql.params.len() == 3);
    }

    #[test]
    fn test_multi_word_sql_shares_tsquery() {
        let sql = compile("http server", 20).unwrap().to_sql();
        check!(sql.text.contains(
            "ts_rank('{0.1, 0.2, 1.0, 1.0}', sd.tsv_path_tokens, to_tsquery('symbols', $1)) * ln(exp(1)+sd.imported_by_count)"
        ));
        check!(sql.text.contains(
            "(s.tsv_name_tokens @@ to_tsquery('symbols', $1) AND sd.tsv_path_tokens @@ to_tsquery('symbols', $1))"
        ));
        check!(sql.params == vec![SqlParam::Text("'http' | 'server'".to_string()), SqlParam::Int(20)]);
    }

    #[test]
    fn test_floor_and_ordering_rendered() {
        let sql = compile("Marshal", 1).unwrap().to_sql();
        check!(sql.text.contains("WHERE r.score > 0.1"));
        check!(sql.text.contains("score DESC,\n\tcommit_time DESC,\n\tsymbol_name,\n\tpackage_path"));
    }
}
