//! Compiler passes over the SQL IR.
//!
//! A pass is a pure function from one [`Query`] to the next. Passes borrow
//! their input and return a fresh value, so the caller's query is never
//! touched. Each pass matches on the [`Query`] variant it is defined for and
//! fails with [`PassError::VariantMismatch`] on anything else; a misordered
//! pipeline can never forward an unpromoted query.
//!
//! The standard order is:
//!
//! ```text
//! Base ─[NormalizeFactQuery]→ Fact ─[BindMeasureAggregation]→ Fact(+aggregations)
//!      ─[BindDimensionJoins]→ Fact(+joins, +dimension columns)
//! ```

mod bind_aggregation;
mod bind_joins;
mod normalize;
mod pipeline;

pub use bind_aggregation::BindMeasureAggregation;
pub use bind_joins::BindDimensionJoins;
pub use normalize::{NormalizeFactQuery, FOREIGN_KEY_SUFFIX, TEMPORAL_SUFFIX};
pub use pipeline::{Pipeline, PipelineError};

use std::fmt;

use crate::sql::query::{Query, QueryKind};

/// A single compiler pass.
///
/// Implementations must be deterministic and side-effect free. They are
/// shared across threads when facts are compiled in parallel.
pub trait Pass: fmt::Debug + Send + Sync {
    /// Stable pass name, used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Produce the next query from `query`.
    fn run(&self, query: &Query) -> Result<Query, PassError>;
}

/// Why a foreign key could not be bound to a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingFailure {
    /// No dimension declares this key.
    Unresolved,
    /// Several dimensions declare this key; all of them, in declaration order.
    MultipleDimensions(Vec<String>),
}

impl fmt::Display for BindingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingFailure::Unresolved => {
                write!(f, "unresolved: no dimension declares this key")
            }
            BindingFailure::MultipleDimensions(dimensions) => write!(
                f,
                "multiple dimensions share this key: {}",
                dimensions.join(", ")
            ),
        }
    }
}

/// Pass failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PassError {
    /// The pass received a query shape it is not defined for.
    #[error("pass '{pass}' expects a {expected}, got a {found}")]
    VariantMismatch {
        pass: &'static str,
        expected: QueryKind,
        found: QueryKind,
    },

    /// A foreign key matched zero or several dimensions.
    #[error("ambiguous foreign key binding in fact '{fact}' for '{foreign_key}': {kind}")]
    AmbiguousForeignKeyBinding {
        fact: String,
        foreign_key: String,
        kind: BindingFailure,
    },
}

impl PassError {
    fn mismatch(pass: &'static str, expected: QueryKind, query: &Query) -> Self {
        PassError::VariantMismatch {
            pass,
            expected,
            found: query.kind(),
        }
    }
}
