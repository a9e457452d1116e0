//! Structural validation of model documents.
//!
//! Runs before lowering and collects every violation instead of stopping at
//! the first. Name comparisons are case-insensitive. The compiler itself
//! never calls this module; it assumes a validated model.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::model::{DimensionDocument, FactDocument, ModelDocument};

/// Validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The document declares no facts.
    NoFacts,
    /// The document declares no dimensions.
    NoDimensions,
    /// A fact with an empty grain.
    MissingGrain { fact: String },
    /// A dimension without a key.
    MissingKey { dimension: String },
    /// A foreign key that matches no dimension key and is not part of the grain.
    UnresolvedForeignKey { fact: String, foreign_key: String },
    /// A foreign key matching more than one dimension.
    AmbiguousForeignKey {
        fact: String,
        foreign_key: String,
        dimensions: Vec<String>,
    },
    /// Several dimensions declaring the same key.
    SharedDimensionKey { key: String, dimensions: Vec<String> },
    /// A measure that is also a grain column or a foreign key.
    MeasureRoleConflict {
        fact: String,
        measure: String,
        role: &'static str,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoFacts => write!(f, "no facts defined in model"),
            ValidationError::NoDimensions => write!(f, "no dimensions defined in model"),
            ValidationError::MissingGrain { fact } => {
                write!(f, "fact '{}' has no grain defined", fact)
            }
            ValidationError::MissingKey { dimension } => {
                write!(f, "dimension '{}' has no key defined", dimension)
            }
            ValidationError::UnresolvedForeignKey { fact, foreign_key } => {
                write!(
                    f,
                    "foreign key '{}' in fact '{}' does not map to any dimension and is not part of fact grain",
                    foreign_key, fact
                )
            }
            ValidationError::AmbiguousForeignKey {
                fact,
                foreign_key,
                dimensions,
            } => {
                write!(
                    f,
                    "foreign key '{}' in fact '{}' maps to multiple dimensions: {}",
                    foreign_key,
                    fact,
                    dimensions.join(", ")
                )
            }
            ValidationError::SharedDimensionKey { key, dimensions } => {
                write!(
                    f,
                    "many-to-many detected: key '{}' is used by multiple dimensions: {}",
                    key,
                    dimensions.join(", ")
                )
            }
            ValidationError::MeasureRoleConflict {
                fact,
                measure,
                role,
            } => {
                write!(f, "fact '{}' measure '{}' is also a {}", fact, measure, role)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a model document.
pub fn validate(document: &ModelDocument) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_facts(document, &mut errors);
    validate_dimensions(document, &mut errors);
    validate_shared_keys(&document.dimensions, &mut errors);
    validate_foreign_keys(document, &mut errors);
    validate_measures(&document.facts, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn lowered<'a>(names: impl IntoIterator<Item = &'a String>) -> HashSet<String> {
    names.into_iter().map(|n| n.to_lowercase()).collect()
}

fn dimension_key(dimension: &DimensionDocument) -> Option<&str> {
    dimension.key.as_deref().filter(|k| !k.is_empty())
}

fn validate_facts(document: &ModelDocument, errors: &mut Vec<ValidationError>) {
    if document.facts.is_empty() {
        errors.push(ValidationError::NoFacts);
    }

    for (name, fact) in &document.facts {
        if fact.grain.is_empty() {
            errors.push(ValidationError::MissingGrain { fact: name.clone() });
        }
    }
}

fn validate_dimensions(document: &ModelDocument, errors: &mut Vec<ValidationError>) {
    if document.dimensions.is_empty() {
        errors.push(ValidationError::NoDimensions);
    }

    for (name, dimension) in &document.dimensions {
        if dimension_key(dimension).is_none() {
            errors.push(ValidationError::MissingKey {
                dimension: name.clone(),
            });
        }
    }
}

fn validate_shared_keys(
    dimensions: &IndexMap<String, DimensionDocument>,
    errors: &mut Vec<ValidationError>,
) {
    let mut usage: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, dimension) in dimensions {
        if let Some(key) = dimension_key(dimension) {
            usage.entry(key.to_lowercase()).or_default().push(name.clone());
        }
    }

    for (key, names) in usage {
        if names.len() > 1 {
            errors.push(ValidationError::SharedDimensionKey {
                key,
                dimensions: names,
            });
        }
    }
}

fn validate_foreign_keys(document: &ModelDocument, errors: &mut Vec<ValidationError>) {
    for (fact_name, fact) in &document.facts {
        let grain = lowered(&fact.grain);

        for fk in &fact.foreign_keys {
            let fk_lower = fk.to_lowercase();
            let matching: Vec<String> = document
                .dimensions
                .iter()
                .filter(|(_, d)| dimension_key(d).is_some_and(|k| k.to_lowercase() == fk_lower))
                .map(|(name, _)| name.clone())
                .collect();

            match matching.len() {
                0 if grain.contains(&fk_lower) => {}
                0 => errors.push(ValidationError::UnresolvedForeignKey {
                    fact: fact_name.clone(),
                    foreign_key: fk.clone(),
                }),
                1 => {}
                _ => errors.push(ValidationError::AmbiguousForeignKey {
                    fact: fact_name.clone(),
                    foreign_key: fk.clone(),
                    dimensions: matching,
                }),
            }
        }
    }
}

fn validate_measures(facts: &IndexMap<String, FactDocument>, errors: &mut Vec<ValidationError>) {
    for (fact_name, fact) in facts {
        let grain = lowered(&fact.grain);
        let foreign_keys = lowered(&fact.foreign_keys);

        for measure in &fact.measures {
            let lower = measure.to_lowercase();
            let role = if grain.contains(&lower) {
                Some("grain column")
            } else if foreign_keys.contains(&lower) {
                Some("foreign key")
            } else {
                None
            };

            if let Some(role) = role {
                errors.push(ValidationError::MeasureRoleConflict {
                    fact: fact_name.clone(),
                    measure: measure.clone(),
                    role,
                });
            }
        }
    }
}
