//! Lowering a model document to the semantic IR.
//!
//! Lowering is a pure structural copy. It assumes the document already
//! passed upstream validation and does not re-check it: the only failure is
//! a dimension without a key, which the IR cannot represent.

use tracing::debug;

use crate::model::{
    Dimension, DimensionDocument, Fact, FactDocument, Measure, ModelDocument, SemanticModel,
};

/// Lower a validated model document to a semantic model.
///
/// Facts and dimensions keep their declaration order, as do every column
/// list inside them.
pub fn lower(document: &ModelDocument) -> Result<SemanticModel, LoweringError> {
    let mut model = SemanticModel::new();

    for (name, fact) in &document.facts {
        model.facts.insert(name.clone(), lower_fact(name, fact));
    }

    for (name, dimension) in &document.dimensions {
        let dimension = lower_dimension(name, dimension)?;
        model.dimensions.insert(name.clone(), dimension);
    }

    debug!(
        facts = model.facts.len(),
        dimensions = model.dimensions.len(),
        "lowered model document"
    );

    Ok(model)
}

fn lower_fact(name: &str, fact: &FactDocument) -> Fact {
    Fact {
        name: name.to_string(),
        grain: fact.grain.clone(),
        measures: fact.measures.iter().cloned().map(Measure::from).collect(),
        foreign_keys: fact.foreign_keys.clone(),
    }
}

fn lower_dimension(name: &str, dimension: &DimensionDocument) -> Result<Dimension, LoweringError> {
    let key = match dimension.key.as_deref() {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => {
            return Err(LoweringError::ContractViolation {
                entity: "dimension",
                name: name.to_string(),
                field: "key",
            })
        }
    };

    Ok(Dimension {
        name: name.to_string(),
        key,
        grain: dimension.grain.clone(),
        attributes: dimension.attributes.clone(),
    })
}

/// Lowering failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    /// The document is missing a field upstream validation guarantees.
    #[error("contract violation: {entity} '{name}' has no {field}")]
    ContractViolation {
        entity: &'static str,
        name: String,
        field: &'static str,
    },
}
