//! Fact definitions - the tables compiled into one view each.

use super::measure::Measure;

/// A fact: grain, measures and foreign keys, all in declared order.
///
/// Order is significant. Grain order becomes GROUP BY order and the leading
/// SELECT columns; foreign key order becomes join order; measure order
/// becomes the order of aggregated columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    /// Fact name, also the FROM table (e.g., "fact_orders")
    pub name: String,

    /// Columns uniquely identifying one row
    pub grain: Vec<String>,

    /// Measures available on this fact
    pub measures: Vec<Measure>,

    /// Columns referencing a dimension key
    pub foreign_keys: Vec<String>,
}

impl Fact {
    /// Create a new fact with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grain: vec![],
            measures: vec![],
            foreign_keys: vec![],
        }
    }

    pub fn with_grain<I, S>(mut self, grain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grain = grain.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_measures<I, S>(mut self, measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.measures = measures.into_iter().map(Measure::new).collect();
        self
    }

    pub fn with_foreign_keys<I, S>(mut self, foreign_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.foreign_keys = foreign_keys.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `column` is part of this fact's grain.
    pub fn is_grain(&self, column: &str) -> bool {
        self.grain.iter().any(|g| g == column)
    }

    /// Measure names in declared order.
    pub fn measure_names(&self) -> impl Iterator<Item = &str> {
        self.measures.iter().map(|m| m.name.as_str())
    }
}
