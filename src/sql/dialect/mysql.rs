//! MySQL dialect.
//!
//! Backtick identifiers; `ANSI_QUOTES` mode is not assumed. View and column
//! names are limited to 64 characters.

use super::helpers;
use super::SqlDialect;

/// MySQL view target.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(64)
    }
}
