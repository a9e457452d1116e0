//! Renderer - fact query to SQL text.
//!
//! Output shape, fixed:
//!
//! ```text
//! SELECT
//!   <grain columns>,
//!   <dimension columns>,
//!   <OP>(<measure>) AS <measure>
//! FROM <fact>
//! <JOIN_TYPE> JOIN <table> ON <predicate>
//! GROUP BY <grain columns>
//! ```
//!
//! JOIN and GROUP BY lines are omitted when empty. There is no trailing
//! terminator and no view wrapper.

use std::collections::HashSet;

use super::dialect::{Dialect, SqlDialect};
use super::query::{FactQuery, Join, Predicate, Query};

/// Render a fact query with the generic dialect.
pub fn render(query: &FactQuery) -> Result<String, RenderError> {
    Renderer::default().render(query)
}

/// Renders fact queries for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    dialect: Dialect,
}

impl Renderer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Render a pipeline result. Only fact queries can be rendered.
    pub fn render_query(&self, query: &Query) -> Result<String, RenderError> {
        match query {
            Query::Fact(fact) => self.render(fact),
            Query::Base(base) => Err(RenderError::UnpromotedQuery {
                table: base.from_table.clone(),
            }),
        }
    }

    /// Render a fact query to SQL text.
    pub fn render(&self, query: &FactQuery) -> Result<String, RenderError> {
        check_invariants(query)?;

        let clauses = [
            self.render_select(query),
            self.render_from(query),
            self.render_joins(&query.joins),
            self.render_group_by(&query.group_by),
        ];

        Ok(clauses
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn render_select(&self, query: &FactQuery) -> String {
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut columns = Vec::new();

        for column in query.grain_columns.iter().chain(&query.dimension_columns) {
            if emitted.insert(column.as_str()) {
                columns.push(self.dialect.quote_qualified(column));
            }
        }

        // Measure declaration order, not aggregation insertion order
        for measure in &query.measures {
            if let Some(aggregation) = query.aggregations.get(measure) {
                let ident = self.dialect.quote_identifier(measure);
                columns.push(format!(
                    "{}({}) AS {}",
                    aggregation.operator.as_sql(),
                    ident,
                    ident
                ));
            }
        }

        format!("SELECT\n  {}", columns.join(",\n  "))
    }

    fn render_from(&self, query: &FactQuery) -> String {
        format!("FROM {}", self.dialect.quote_qualified(&query.from_table))
    }

    fn render_joins(&self, joins: &[Join]) -> String {
        joins
            .iter()
            .map(|join| {
                format!(
                    "{} JOIN {} ON {}",
                    join.join_type.as_sql(),
                    self.dialect.quote_qualified(&join.table),
                    self.render_predicate(&join.predicate)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_predicate(&self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Equals { left, right } => format!(
                "{} = {}",
                self.dialect.quote_qualified(left),
                self.dialect.quote_qualified(right)
            ),
        }
    }

    fn render_group_by(&self, group_by: &[String]) -> String {
        if group_by.is_empty() {
            return String::new();
        }

        let columns: Vec<_> = group_by
            .iter()
            .map(|c| self.dialect.quote_qualified(c))
            .collect();
        format!("GROUP BY {}", columns.join(", "))
    }
}

/// Internal invariants a fact query must satisfy before rendering.
fn check_invariants(query: &FactQuery) -> Result<(), RenderError> {
    let violation = |reason: String| RenderError::ContractViolation {
        fact: query.from_table.clone(),
        reason,
    };

    for (key, aggregation) in &query.aggregations {
        if !query.measures.contains(key) {
            return Err(violation(format!(
                "aggregation for '{}' has no matching measure",
                key
            )));
        }
        if &aggregation.measure != key {
            return Err(violation(format!(
                "aggregation keyed '{}' targets measure '{}'",
                key, aggregation.measure
            )));
        }
    }

    if query.group_by != query.grain_columns {
        return Err(violation(
            "GROUP BY does not match the grain columns".to_string(),
        ));
    }

    if query.grain_columns.is_empty()
        && query.dimension_columns.is_empty()
        && query.aggregations.is_empty()
    {
        return Err(violation("SELECT list is empty".to_string()));
    }

    Ok(())
}

/// Rendering failure. Both variants are internal defects, not model errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("rendering contract violation in '{fact}': {reason}")]
    ContractViolation { fact: String, reason: String },

    #[error("query for '{table}' was never normalized into a fact query")]
    UnpromotedQuery { table: String },
}
