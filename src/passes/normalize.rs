//! Normalization: base query to fact query.
//!
//! Every selected alias lands in exactly one role. Precedence:
//!
//! 1. grain - taken from GROUP BY, never reclassified
//! 2. foreign key - non-grain alias ending in `_id`
//! 3. temporal - non-grain alias ending in `_date`
//! 4. measure - everything else
//!
//! This is a naming-convention classifier. It does not look at types and it
//! does not consult the semantic model.

use tracing::debug;

use crate::sql::query::{BaseQuery, FactQuery, Query, QueryKind};

use super::{Pass, PassError};

/// Alias suffix marking a foreign key.
pub const FOREIGN_KEY_SUFFIX: &str = "_id";

/// Alias suffix marking a dimension-like temporal column.
pub const TEMPORAL_SUFFIX: &str = "_date";

/// Promotes a [`Query::Base`] to a [`Query::Fact`] by classifying columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeFactQuery;

impl NormalizeFactQuery {
    pub fn new() -> Self {
        Self
    }

    fn normalize(&self, base: &BaseQuery) -> FactQuery {
        let grain_columns = base.group_by.clone();
        let is_grain = |alias: &str| grain_columns.iter().any(|g| g == alias);

        // Aliases in SELECT order, first occurrence wins
        let mut aliases: Vec<&str> = Vec::with_capacity(base.select.len());
        for column in &base.select {
            if !aliases.contains(&column.alias.as_str()) {
                aliases.push(&column.alias);
            }
        }

        let foreign_keys: Vec<String> = aliases
            .iter()
            .copied()
            .filter(|a| !is_grain(a) && a.ends_with(FOREIGN_KEY_SUFFIX))
            .map(str::to_string)
            .collect();
        let is_foreign_key = |alias: &str| foreign_keys.iter().any(|fk| fk == alias);

        let temporal: Vec<String> = aliases
            .iter()
            .copied()
            .filter(|a| !is_grain(a) && !is_foreign_key(a) && a.ends_with(TEMPORAL_SUFFIX))
            .map(str::to_string)
            .collect();

        let measures: Vec<String> = aliases
            .iter()
            .copied()
            .filter(|a| !is_grain(a) && !is_foreign_key(a) && !temporal.iter().any(|t| t == a))
            .map(str::to_string)
            .collect();

        let dimension_columns: Vec<String> =
            foreign_keys.iter().chain(&temporal).cloned().collect();

        debug!(
            fact = %base.from_table,
            grain = grain_columns.len(),
            foreign_keys = foreign_keys.len(),
            temporal = temporal.len(),
            measures = measures.len(),
            "normalized fact query"
        );

        FactQuery {
            select: base.select.clone(),
            from_table: base.from_table.clone(),
            joins: base.joins.clone(),
            group_by: base.group_by.clone(),
            grain_columns,
            foreign_keys,
            measures,
            dimension_columns,
            aggregations: Default::default(),
        }
    }
}

impl Pass for NormalizeFactQuery {
    fn name(&self) -> &'static str {
        "normalize_fact_query"
    }

    fn run(&self, query: &Query) -> Result<Query, PassError> {
        match query {
            Query::Base(base) => Ok(Query::Fact(self.normalize(base))),
            Query::Fact(_) => Err(PassError::mismatch(self.name(), QueryKind::Base, query)),
        }
    }
}
