//! SQL IR builder - the boundary between the semantic IR and the SQL IR.
//!
//! One [`BaseQuery`] per fact. Nothing is inferred or bound here: every
//! declared column is selected raw and roles are left to the passes.

use crate::model::{Fact, SemanticModel};

use super::query::{BaseQuery, SelectColumn};

/// Build one base query per fact, in fact declaration order.
pub fn build_queries(model: &SemanticModel) -> Result<Vec<BaseQuery>, BuildError> {
    model.facts.values().map(build_fact_query).collect()
}

/// Build the base query for a single fact.
///
/// SELECT order: grain columns, then foreign keys, then raw measures.
/// GROUP BY is a copy of the grain.
pub fn build_fact_query(fact: &Fact) -> Result<BaseQuery, BuildError> {
    if fact.grain.is_empty() {
        return Err(BuildError::ContractViolation {
            fact: fact.name.clone(),
            reason: "fact has an empty grain".to_string(),
        });
    }

    let select = fact
        .grain
        .iter()
        .chain(fact.foreign_keys.iter())
        .map(|column| SelectColumn::column(column))
        .chain(fact.measures.iter().map(|m| SelectColumn::column(&m.name)))
        .collect();

    Ok(BaseQuery {
        select,
        from_table: fact.name.clone(),
        joins: vec![],
        group_by: fact.grain.clone(),
    })
}

/// SQL IR construction failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The fact is missing something upstream validation guarantees.
    #[error("contract violation in fact '{fact}': {reason}")]
    ContractViolation { fact: String, reason: String },
}
