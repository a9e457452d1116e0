//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! - Square bracket identifiers (`[name]`)
//! - No CREATE OR REPLACE VIEW; SQL Server 2016 SP1+ has CREATE OR ALTER VIEW
//! - `sysname` identifiers, 128 characters

use super::helpers;
use super::SqlDialect;

/// SQL Server view target.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn supports_create_or_replace_view(&self) -> bool {
        false
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(128)
    }
}
