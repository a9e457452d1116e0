//! Serde document types mirroring the model file.
//!
//! A document is the raw, unvalidated shape of a model file:
//!
//! ```yaml
//! facts:
//!   fact_orders:
//!     grain: [order_id]
//!     foreign_keys: [customer_id]
//!     measures: [total_amount]
//! dimensions:
//!   dim_customer:
//!     key: customer_id
//!     attributes: [customer_name, region]
//! ```
//!
//! Optional lists default to empty. A dimension `key` stays optional here so
//! the upstream validator can report it; lowering treats its absence as a
//! contract violation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of a model file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub facts: IndexMap<String, FactDocument>,

    #[serde(default)]
    pub dimensions: IndexMap<String, DimensionDocument>,
}

/// A fact entry. The fact name is the map key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FactDocument {
    #[serde(default)]
    pub grain: Vec<String>,

    #[serde(default)]
    pub measures: Vec<String>,

    #[serde(default)]
    pub foreign_keys: Vec<String>,
}

/// A dimension entry. The dimension name is the map key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DimensionDocument {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub grain: Vec<String>,

    #[serde(default)]
    pub attributes: Vec<String>,
}
