//! Semantic IR: the typed in-memory model of facts and dimensions.
//!
//! A [`SemanticModel`] is built once per compilation by [`crate::lowering`]
//! and never mutated afterwards. Every per-fact pipeline shares it read-only,
//! so it is `Send + Sync` and usually wrapped in an `Arc`.
//!
//! Both maps preserve insertion order. Fact iteration order is the declared
//! order of the model file and determines the order of compiled output.

pub mod dimension;
pub mod document;
pub mod fact;
pub mod loader;
pub mod measure;

pub use dimension::Dimension;
pub use document::{DimensionDocument, FactDocument, ModelDocument};
pub use fact::Fact;
pub use measure::Measure;

use indexmap::IndexMap;

/// The semantic model: facts and dimensions keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticModel {
    /// Facts in declaration order.
    pub facts: IndexMap<String, Fact>,

    /// Dimensions in declaration order.
    pub dimensions: IndexMap<String, Dimension>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact, keyed by its name.
    pub fn with_fact(mut self, fact: Fact) -> Self {
        self.facts.insert(fact.name.clone(), fact);
        self
    }

    /// Add a dimension, keyed by its name.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.insert(dimension.name.clone(), dimension);
        self
    }

    pub fn fact(&self, name: &str) -> Option<&Fact> {
        self.facts.get(name)
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    /// All dimensions whose key equals `key`, in declaration order.
    ///
    /// More than one result means the model shares a key between dimensions,
    /// which join binding reports as an error.
    pub fn dimensions_keyed_by<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Dimension> + 'a {
        self.dimensions.values().filter(move |d| d.key == key)
    }
}
