// src/model/dimension.rs

/// A dimension: a descriptive entity keyed by a business key.
///
/// The dimension name doubles as its table name when joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    /// Business key column, matched against fact foreign keys
    pub key: String,
    /// Grain columns, in declared order
    pub grain: Vec<String>,
    /// Attribute columns, in declared order
    pub attributes: Vec<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            grain: vec![],
            attributes: vec![],
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

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// The qualified key column, e.g. `dim_customer.customer_id`.
    pub fn qualified_key(&self) -> String {
        format!("{}.{}", self.name, self.key)
    }
}
