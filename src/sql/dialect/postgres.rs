//! PostgreSQL dialect.
//!
//! Double-quoted identifiers. Names longer than `NAMEDATALEN - 1` bytes are
//! truncated by the server without error, so view names are checked up front.

use super::helpers;
use super::SqlDialect;

/// PostgreSQL view target.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(63)
    }

    // NAMEDATALEN is a byte limit
    fn identifier_length(&self, ident: &str) -> usize {
        ident.len()
    }
}
