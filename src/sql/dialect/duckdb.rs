//! DuckDB dialect.
//!
//! PostgreSQL-compatible for everything the view compiler emits: double-quoted
//! identifiers and CREATE OR REPLACE VIEW. DuckDB has no practical name limit.

use super::helpers;
use super::SqlDialect;

/// DuckDB view target.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }
}
