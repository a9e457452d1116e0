// src/model/measure.rs

/// A numeric fact column intended for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Measure {
    pub name: String,
}

impl Measure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for Measure {
    fn from(name: &str) -> Self {
        Measure::new(name)
    }
}

impl From<String> for Measure {
    fn from(name: String) -> Self {
        Measure { name }
    }
}
