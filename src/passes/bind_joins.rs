//! Dimension join binding.
//!
//! The only pass that needs the semantic model: each foreign key on the fact
//! query is resolved against dimension keys.
//!
//! | dimensions with key = fk | fk in grain | result |
//! |---|---|---|
//! | 0 | yes | degenerate key, skipped |
//! | 0 | no | `Unresolved` |
//! | 1 | - | `LEFT JOIN dim ON fact.fk = dim.key` |
//! | >1 | - | `MultipleDimensions` |

use std::sync::Arc;

use tracing::debug;

use crate::model::SemanticModel;
use crate::sql::query::{FactQuery, Join, Predicate, Query, QueryKind};

use super::{BindingFailure, Pass, PassError};

/// Resolves foreign keys to dimensions and emits one LEFT JOIN per key.
#[derive(Debug, Clone)]
pub struct BindDimensionJoins {
    model: Arc<SemanticModel>,
}

impl BindDimensionJoins {
    pub fn new(model: Arc<SemanticModel>) -> Self {
        Self { model }
    }

    fn bind(&self, query: &FactQuery) -> Result<FactQuery, PassError> {
        // Joins come from the foreign keys alone, never from the input query
        let mut joins = Vec::with_capacity(query.foreign_keys.len());
        let mut dimension_columns = Vec::with_capacity(query.foreign_keys.len());

        for fk in &query.foreign_keys {
            let matches: Vec<_> = self.model.dimensions_keyed_by(fk).collect();

            match matches.as_slice() {
                [] if query.grain_columns.contains(fk) => {
                    debug!(fact = %query.from_table, key = %fk, "skipping degenerate key");
                }
                [] => {
                    return Err(PassError::AmbiguousForeignKeyBinding {
                        fact: query.from_table.clone(),
                        foreign_key: fk.clone(),
                        kind: BindingFailure::Unresolved,
                    });
                }
                [dimension] => {
                    joins.push(Join::left(
                        dimension.name.as_str(),
                        Predicate::equals(
                            format!("{}.{}", query.from_table, fk),
                            dimension.qualified_key(),
                        ),
                    ));
                    dimension_columns.push(dimension.qualified_key());
                }
                many => {
                    return Err(PassError::AmbiguousForeignKeyBinding {
                        fact: query.from_table.clone(),
                        foreign_key: fk.clone(),
                        kind: BindingFailure::MultipleDimensions(
                            many.iter().map(|d| d.name.clone()).collect(),
                        ),
                    });
                }
            }
        }

        debug!(
            fact = %query.from_table,
            joins = joins.len(),
            "bound dimension joins"
        );

        Ok(FactQuery {
            joins,
            dimension_columns,
            ..query.clone()
        })
    }
}

impl Pass for BindDimensionJoins {
    fn name(&self) -> &'static str {
        "bind_dimension_joins"
    }

    fn run(&self, query: &Query) -> Result<Query, PassError> {
        match query {
            Query::Fact(fact) => self.bind(fact).map(Query::Fact),
            Query::Base(_) => Err(PassError::mismatch(self.name(), QueryKind::Fact, query)),
        }
    }
}
