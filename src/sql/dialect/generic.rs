//! Generic dialect - identifiers are emitted verbatim.
//!
//! This is the default. Output is byte-identical to the documented
//! rendering contract, with no quoting or escaping of any kind.

use super::SqlDialect;

/// Unquoted output, no identifier length limit.
#[derive(Debug, Clone, Copy)]
pub struct Generic;

impl SqlDialect for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        ident.to_string()
    }
}
