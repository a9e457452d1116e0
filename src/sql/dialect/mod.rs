//! SQL Dialect definitions and formatting rules.
//!
//! Dialects only affect identifier quoting and the view wrapper keyword.
//! They never change clause or column order.
//!
//! - Identifier quoting: none (Generic), `"` (PG/DuckDB), `` ` `` (MySQL), `[]` (T-SQL)
//! - View wrapper: `CREATE OR REPLACE VIEW` vs `CREATE OR ALTER VIEW` (T-SQL)
//! - Identifier length limit, checked before a view name is emitted
//!
//! # Usage
//!
//! ```ignore
//! use semview::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```

mod duckdb;
mod generic;
pub mod helpers;
mod mysql;
mod postgres;
mod tsql;

pub use duckdb::DuckDb;
pub use generic::Generic;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use tsql::TSql;

use serde::{Deserialize, Serialize};

/// SQL dialect trait - defines how identifiers and views are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote a single identifier part (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a possibly qualified name (`table.column`) part by part.
    fn quote_qualified(&self, name: &str) -> String {
        helpers::quote_qualified(name, |part| self.quote_identifier(part))
    }

    /// Whether this dialect supports CREATE OR REPLACE VIEW.
    ///
    /// - PostgreSQL/DuckDB/MySQL: true
    /// - T-SQL: false (CREATE OR ALTER VIEW)
    fn supports_create_or_replace_view(&self) -> bool {
        true
    }

    /// Longest identifier the dialect accepts, if it enforces one.
    ///
    /// - PostgreSQL: 63, truncates silently
    /// - MySQL: 64
    /// - T-SQL: 128
    fn max_identifier_length(&self) -> Option<usize> {
        None
    }

    /// Length of `ident` in the unit the limit is measured in.
    ///
    /// Characters by default. PostgreSQL counts bytes.
    fn identifier_length(&self, ident: &str) -> usize {
        ident.chars().count()
    }

    /// Leading keywords of a view definition.
    fn create_view_keyword(&self) -> &'static str {
        if self.supports_create_or_replace_view() {
            "CREATE OR REPLACE VIEW"
        } else {
            "CREATE OR ALTER VIEW"
        }
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Postgres,
    DuckDb,
    MySql,
    TSql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Generic => &Generic,
            Dialect::Postgres => &Postgres,
            Dialect::DuckDb => &DuckDb,
            Dialect::MySql => &MySql,
            Dialect::TSql => &TSql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn supports_create_or_replace_view(&self) -> bool {
        self.dialect().supports_create_or_replace_view()
    }

    fn max_identifier_length(&self) -> Option<usize> {
        self.dialect().max_identifier_length()
    }

    fn identifier_length(&self, ident: &str) -> usize {
        self.dialect().identifier_length(ident)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "duckdb" => Ok(Dialect::DuckDb),
            "mysql" => Ok(Dialect::MySql),
            "tsql" | "mssql" => Ok(Dialect::TSql),
            other => Err(format!("unknown dialect: {}", other)),
        }
    }
}
